use async_trait::async_trait;
use upsell_shared::{CalculatedPurchase, Change};

/// Capabilities the checkout runtime hands to a post-purchase extension
#[async_trait]
pub trait CheckoutPlatform: Send + Sync {
    /// Ask the platform to price `changes` against the current purchase
    async fn calculate_changeset(&self, changes: &[Change]) -> Result<CalculatedPurchase, PlatformError>;

    /// Apply a changeset. Takes the server-signed token, never raw changes.
    async fn apply_changeset(&self, token: &str) -> Result<(), PlatformError>;

    /// Leave the post-purchase page (redirects to the thank-you page)
    async fn done(&self);
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Changeset calculation failed: {0}")]
    Calculation(String),

    #[error("Changeset rejected: {0}")]
    Rejected(String),

    #[error("Platform unavailable: {0}")]
    Unavailable(String),
}
