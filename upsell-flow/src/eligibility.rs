use serde::{Deserialize, Serialize};
use upsell_shared::Offer;

use crate::backend::OfferBackend;

/// What the checkout runtime passes to the extension
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputData {
    pub token: String,
    pub initial_purchase: InitialPurchase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialPurchase {
    pub reference_id: String,
    #[serde(default)]
    pub line_items: Vec<PurchaseLineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseLineItem {
    pub product: PurchasedProduct,
    #[serde(default)]
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchasedProduct {
    pub title: String,
}

/// Offers carried from the eligibility step to the render step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OfferPayload {
    pub offers: Vec<Offer>,
}

/// Client-side storage shared between the two extension points
#[derive(Debug, Clone, Default)]
pub struct ExtensionStorage {
    initial_data: Option<OfferPayload>,
}

impl ExtensionStorage {
    pub fn update(&mut self, payload: OfferPayload) {
        self.initial_data = Some(payload);
    }

    pub fn initial_data(&self) -> Option<&OfferPayload> {
        self.initial_data.as_ref()
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ShouldRender {
    pub render: bool,
}

/// Eligibility step: fetch offers for this purchase and stash them.
///
/// Any failure means "don't render". The customer goes straight to the
/// thank-you page instead of seeing a broken offer.
pub async fn should_render(
    backend: &dyn OfferBackend,
    input: &InputData,
    storage: &mut ExtensionStorage,
) -> ShouldRender {
    let reference_id = input.initial_purchase.reference_id.as_str();

    match backend.fetch_offers(&input.token, reference_id).await {
        Ok(offers) if offers.is_empty() => {
            tracing::info!(reference_id, "No offers for purchase, skipping");
            ShouldRender { render: false }
        }
        Ok(offers) => {
            tracing::debug!(reference_id, count = offers.len(), "Offers fetched");
            storage.update(OfferPayload { offers });
            ShouldRender { render: true }
        }
        Err(e) => {
            tracing::warn!(reference_id, "Offer fetch failed, not rendering: {}", e);
            ShouldRender { render: false }
        }
    }
}
