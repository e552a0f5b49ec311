//! Calculated purchase as returned by the platform's changeset calculation.
//!
//! These types are read-only views over platform output. Nothing here computes
//! a price; the summary only picks values out of what the platform returned.

use serde::{Deserialize, Serialize};

use crate::money::Amount;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PriceSet {
    pub presentment_money: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_money: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub price_set: Option<PriceSet>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaxLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub price_set: Option<PriceSet>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedLineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    pub price_set: Option<PriceSet>,
    pub total_price_set: Option<PriceSet>,
}

/// Pricing breakdown computed by the platform for a requested set of changes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedPurchase {
    #[serde(default)]
    pub added_shipping_lines: Vec<ShippingLine>,
    #[serde(default)]
    pub added_tax_lines: Vec<TaxLine>,
    #[serde(default)]
    pub updated_line_items: Vec<UpdatedLineItem>,
    pub total_outstanding_set: Option<PriceSet>,
}

fn presentment(set: Option<&PriceSet>) -> Option<Amount> {
    set.map(|s| s.presentment_money.amount.clone())
}

/// The five values the offer page shows. Each is `None` when the platform
/// did not return the corresponding line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PriceSummary {
    pub shipping: Option<Amount>,
    pub taxes: Option<Amount>,
    pub total: Option<Amount>,
    pub discounted_price: Option<Amount>,
    pub original_price: Option<Amount>,
}

impl PriceSummary {
    pub fn from_purchase(purchase: &CalculatedPurchase) -> Self {
        let first_item = purchase.updated_line_items.first();
        Self {
            shipping: presentment(
                purchase.added_shipping_lines.first().and_then(|l| l.price_set.as_ref()),
            ),
            taxes: presentment(
                purchase.added_tax_lines.first().and_then(|l| l.price_set.as_ref()),
            ),
            total: presentment(purchase.total_outstanding_set.as_ref()),
            discounted_price: presentment(first_item.and_then(|i| i.total_price_set.as_ref())),
            original_price: presentment(first_item.and_then(|i| i.price_set.as_ref())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_platform_payload() {
        let purchase: CalculatedPurchase = serde_json::from_value(serde_json::json!({
            "addedShippingLines": [{"priceSet": {"presentmentMoney": {"amount": "0.00", "currencyCode": "USD"}}}],
            "addedTaxLines": [{"priceSet": {"presentmentMoney": {"amount": "0.45", "currencyCode": "USD"}}}],
            "updatedLineItems": [{
                "priceSet": {"presentmentMoney": {"amount": "10.00", "currencyCode": "USD"}},
                "totalPriceSet": {"presentmentMoney": {"amount": "5.00", "currencyCode": "USD"}}
            }],
            "totalOutstandingSet": {"presentmentMoney": {"amount": "5.45", "currencyCode": "USD"}}
        }))
        .unwrap();

        let summary = PriceSummary::from_purchase(&purchase);
        assert_eq!(summary.shipping, Some(Amount::from("0.00")));
        assert_eq!(summary.taxes, Some(Amount::from("0.45")));
        assert_eq!(summary.total, Some(Amount::from("5.45")));
        assert_eq!(summary.discounted_price, Some(Amount::from("5.00")));
        assert_eq!(summary.original_price, Some(Amount::from("10.00")));
    }

    #[test]
    fn test_summary_missing_lines() {
        let summary = PriceSummary::from_purchase(&CalculatedPurchase::default());
        assert_eq!(summary, PriceSummary::default());
    }
}
