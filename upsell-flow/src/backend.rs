use async_trait::async_trait;
use upsell_shared::{Offer, OfferId};

/// The app server as seen from the checkout extension
#[async_trait]
pub trait OfferBackend: Send + Sync {
    /// `POST /api/offer`
    async fn fetch_offers(&self, token: &str, reference_id: &str) -> Result<Vec<Offer>, BackendError>;

    /// `POST /api/sign-changeset`. The server looks up the changes for
    /// `offer_id` itself; only the id crosses the wire.
    async fn sign_changeset(&self, token: &str, reference_id: &str, offer_id: OfferId) -> SignOutcome;
}

/// Result of asking the server to sign a changeset.
///
/// A failure carries the reason and must stop the apply step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignOutcome {
    Signed(String),
    Failed(String),
}

impl SignOutcome {
    pub fn is_signed(&self) -> bool {
        matches!(self, SignOutcome::Signed(_))
    }
}

impl From<Result<String, BackendError>> for SignOutcome {
    fn from(result: Result<String, BackendError>) -> Self {
        match result {
            Ok(token) if !token.is_empty() => SignOutcome::Signed(token),
            Ok(_) => SignOutcome::Failed("server returned an empty token".to_string()),
            Err(e) => SignOutcome::Failed(e.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid app URL: {0}")]
    InvalidUrl(String),
}
