pub mod models;
pub mod money;
pub mod secret;

pub use models::changeset::{CalculatedPurchase, Money, PriceSet, PriceSummary};
pub use models::offer::{Change, ChangeType, Discount, DiscountValueType, Offer, OfferId};
pub use money::{format_currency, money_line, Amount};
pub use secret::Secret;
