pub mod authority;
pub mod catalog;
pub mod seed;

pub use authority::PricingAuthority;
pub use catalog::{CatalogError, OfferCatalog};
