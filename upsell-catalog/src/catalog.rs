use std::collections::HashSet;

use upsell_shared::{Offer, OfferId};

use crate::seed;

/// Immutable table of upsell offers, seeded once at process start.
///
/// Lookups are linear: the table holds a handful of offers and order matters
/// for listing.
#[derive(Debug, Clone)]
pub struct OfferCatalog {
    offers: Vec<Offer>,
}

impl OfferCatalog {
    /// Build a catalog from an explicit list. Ids must be unique.
    pub fn new(offers: Vec<Offer>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for offer in &offers {
            if !seen.insert(offer.id) {
                return Err(CatalogError::DuplicateOffer(offer.id));
            }
        }
        Ok(Self { offers })
    }

    /// The built-in offer table
    pub fn seeded() -> Self {
        Self {
            offers: seed::default_offers(),
        }
    }

    /// All offers in seed order, unfiltered
    pub fn list_offers(&self) -> &[Offer] {
        &self.offers
    }

    /// Find an offer by id. `None` when nothing matches.
    pub fn get_offer(&self, id: OfferId) -> Option<&Offer> {
        self.offers.iter().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}

impl Default for OfferCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Offer not found: {0}")]
    OfferNotFound(OfferId),

    #[error("Duplicate offer id in catalog: {0}")]
    DuplicateOffer(OfferId),
}
