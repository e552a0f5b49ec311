use async_trait::async_trait;
use upsell_shared::{Change, Offer, OfferId};

use crate::catalog::{CatalogError, OfferCatalog};

/// Server-side source of truth for what a purchase may be offered.
///
/// Clients send only an offer id; the changes that get signed always come
/// from here, so a tampered request cannot alter a discount.
#[async_trait]
pub trait PricingAuthority: Send + Sync {
    /// Offers to present for the purchase identified by `reference_id`
    async fn offers_for(&self, reference_id: &str) -> Result<Vec<Offer>, CatalogError>;

    /// The exact changes authorised for `offer_id` on this purchase
    async fn changes_for(
        &self,
        reference_id: &str,
        offer_id: OfferId,
    ) -> Result<Vec<Change>, CatalogError>;
}

#[async_trait]
impl PricingAuthority for OfferCatalog {
    async fn offers_for(&self, _reference_id: &str) -> Result<Vec<Offer>, CatalogError> {
        // No targeting yet: every purchase sees the whole table
        Ok(self.list_offers().to_vec())
    }

    async fn changes_for(
        &self,
        _reference_id: &str,
        offer_id: OfferId,
    ) -> Result<Vec<Change>, CatalogError> {
        self.get_offer(offer_id)
            .map(|o| o.changes.clone())
            .ok_or(CatalogError::OfferNotFound(offer_id))
    }
}
