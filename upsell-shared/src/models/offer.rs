use serde::{Deserialize, Serialize};

use crate::money::Amount;

pub type OfferId = u64;

/// Kind of purchase mutation the platform is asked to make
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    AddVariant,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscountValueType {
    Percentage,
    FixedAmount,
    Price,
}

/// Discount attached to a change. `value` is kept as the catalog wrote it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub value: serde_json::Number,
    pub value_type: DiscountValueType,
    pub title: String,
}

/// A single platform-level purchase mutation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Change {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    #[serde(rename = "variantID")]
    pub variant_id: u64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
}

impl Change {
    pub fn add_variant(variant_id: u64, quantity: u32) -> Self {
        Self {
            change_type: ChangeType::AddVariant,
            variant_id,
            quantity,
            discount: None,
        }
    }

    pub fn with_discount(mut self, discount: Discount) -> Self {
        self.discount = Some(discount);
        self
    }
}

/// An upsell offer presented after checkout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: OfferId,
    pub title: String,
    pub product_title: String,
    #[serde(rename = "productImageURL")]
    pub product_image_url: String,
    #[serde(default)]
    pub product_description: Vec<String>,
    pub original_price: Amount,
    pub discounted_price: Amount,
    pub changes: Vec<Change>,
}

impl Offer {
    /// Title of the first change's discount, e.g. "(Save 50%)"
    pub fn discount_title(&self) -> Option<&str> {
        self.changes
            .first()
            .and_then(|c| c.discount.as_ref())
            .map(|d| d.title.as_str())
    }
}
