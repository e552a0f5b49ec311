use std::fs;
use std::path::Path;

use upsell_catalog::{CatalogError, OfferCatalog};
use upsell_shared::Offer;

/// Build the offer catalog once at startup.
///
/// Without a seed file the built-in table is used. A seed file is a JSON
/// array of offers in wire format.
pub fn load_catalog(seed_path: Option<&Path>) -> Result<OfferCatalog, SeedError> {
    let Some(path) = seed_path else {
        tracing::info!("No offer seed file configured, using built-in offers");
        return Ok(OfferCatalog::seeded());
    };

    let raw = fs::read_to_string(path).map_err(|e| SeedError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    let offers: Vec<Offer> = serde_json::from_str(&raw)?;
    let catalog = OfferCatalog::new(offers)?;

    tracing::info!("Loaded {} offers from {}", catalog.len(), path.display());
    Ok(catalog)
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("upsell-seed-{}-{}.json", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_no_path_uses_builtin() {
        let catalog = load_catalog(None).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_load_from_file() {
        let offers = serde_json::to_string(&upsell_catalog::seed::default_offers()[..1]).unwrap();
        let path = scratch_file("one", &offers);

        let catalog = load_catalog(Some(&path)).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get_offer(1).unwrap().product_title, "Mystery Coffee Bag");

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_duplicate_ids_in_file() {
        let offer = upsell_catalog::seed::default_offers().remove(0);
        let offers = serde_json::to_string(&vec![offer.clone(), offer]).unwrap();
        let path = scratch_file("dup", &offers);

        let result = load_catalog(Some(&path));
        assert!(matches!(result, Err(SeedError::Catalog(CatalogError::DuplicateOffer(1)))));

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file() {
        let result = load_catalog(Some(Path::new("/nonexistent/offers.json")));
        assert!(matches!(result, Err(SeedError::Read { .. })));
    }
}
