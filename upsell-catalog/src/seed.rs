use upsell_shared::{Amount, Change, Discount, DiscountValueType, Offer};

const COFFEE_VARIANT_ID: u64 = 50772069974184;

fn half_off() -> Discount {
    Discount {
        value: serde_json::Number::from(50u32),
        value_type: DiscountValueType::Percentage,
        title: "(Save 50%)".to_string(),
    }
}

/// Offers served when no seed file is configured
pub fn default_offers() -> Vec<Offer> {
    vec![
        Offer {
            id: 1,
            title: "One time offer".to_string(),
            product_title: "Mystery Coffee Bag".to_string(),
            product_image_url:
                "https://cdn.shopify.com/s/files/1/0684/8990/4296/files/image.png?v=1734116135"
                    .to_string(),
            product_description: vec!["Surprise yourself! 😁".to_string()],
            original_price: Amount::from("10.00"),
            discounted_price: Amount::from("10.00"),
            changes: vec![Change::add_variant(COFFEE_VARIANT_ID, 1).with_discount(half_off())],
        },
        Offer {
            id: 2,
            title: "One time offer".to_string(),
            product_title: "Monday Morning Brew".to_string(),
            product_image_url: "https://cdn.shopify.com/s/files/1/0684/8990/4296/files/image_8a91bbad-e1c3-44f1-9914-e2a7c90c859d.png?v=1734116501".to_string(),
            product_description: vec!["Surprise yourself! 😁".to_string()],
            original_price: Amount::from("10.00"),
            discounted_price: Amount::from("10.00"),
            changes: vec![Change::add_variant(COFFEE_VARIANT_ID, 1).with_discount(half_off())],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_offer_changes() {
        let offers = default_offers();
        let change = &offers[0].changes[0];

        assert_eq!(change.variant_id, 50772069974184);
        assert_eq!(change.quantity, 1);
        let discount = change.discount.as_ref().unwrap();
        assert_eq!(discount.value, serde_json::Number::from(50u32));
        assert_eq!(discount.value_type, DiscountValueType::Percentage);
    }
}
