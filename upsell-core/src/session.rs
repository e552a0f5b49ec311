use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use upsell_shared::Secret;

// ============================================================================
// Checkout session token
// ============================================================================

/// Claims carried by the token the checkout extension sends as its bearer.
///
/// The platform signs it with the app's API secret and addresses it to the
/// app's API key.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    #[serde(default)]
    pub iss: Option<String>,
    #[serde(default)]
    pub dest: Option<String>,
    pub aud: String,
    #[serde(default)]
    pub sub: Option<String>,
    pub exp: usize,
    #[serde(default)]
    pub iat: Option<usize>,
    #[serde(default)]
    pub jti: Option<String>,
}

/// Verifies inbound session tokens
#[derive(Clone)]
pub struct SessionVerifier {
    api_key: String,
    secret: Secret,
}

impl SessionVerifier {
    pub fn new(api_key: impl Into<String>, secret: Secret) -> Self {
        Self {
            api_key: api_key.into(),
            secret,
        }
    }

    /// Check signature, expiry and audience. Returns the claims on success.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[self.api_key.as_str()]);

        let token_data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.expose().as_bytes()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!("Session token rejected: {}", e);
            AuthError::InvalidToken(e.to_string())
        })?;

        Ok(token_data.claims)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),
}
