//! Changeset signing.
//!
//! The platform only applies a changeset when it arrives as a JWT signed with
//! the app's API secret. The token names the purchase (`sub`) and carries the
//! exact changes, so whatever the server signs is what gets applied.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use upsell_shared::{Change, Secret};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChangesetClaims {
    pub iss: String,
    pub jti: String,
    pub iat: i64,
    pub sub: String,
    pub changes: Vec<Change>,
}

#[derive(Debug, Serialize, Clone)]
pub struct SignedChangeset {
    pub token: String,
}

#[derive(Clone)]
pub struct ChangesetSigner {
    api_key: String,
    secret: Secret,
}

impl ChangesetSigner {
    pub fn new(api_key: impl Into<String>, secret: Secret) -> Self {
        Self {
            api_key: api_key.into(),
            secret,
        }
    }

    /// Sign `changes` for the purchase identified by `reference_id`
    pub fn sign(&self, reference_id: &str, changes: Vec<Change>) -> Result<SignedChangeset, SignError> {
        if reference_id.is_empty() {
            return Err(SignError::MissingReference);
        }
        if changes.is_empty() {
            return Err(SignError::NoChanges);
        }

        let claims = ChangesetClaims {
            iss: self.api_key.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: Utc::now().timestamp(),
            sub: reference_id.to_string(),
            changes,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.expose().as_bytes()),
        )
        .map_err(|e| SignError::Encoding(e.to_string()))?;

        tracing::debug!(reference_id, jti = %claims.jti, "Signed changeset");
        Ok(SignedChangeset { token })
    }

    /// Decode a token this signer produced. Changeset tokens carry no `exp`.
    pub fn verify(&self, token: &str) -> Result<ChangesetClaims, SignError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        decode::<ChangesetClaims>(
            token,
            &DecodingKey::from_secret(self.secret.expose().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| SignError::Encoding(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SignError {
    #[error("Reference id is required")]
    MissingReference,

    #[error("Refusing to sign an empty changeset")]
    NoChanges,

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> ChangesetSigner {
        ChangesetSigner::new("api-key", Secret::from("s3cret"))
    }

    #[test]
    fn test_sign_carries_reference_and_changes() {
        let changes = vec![Change::add_variant(50772069974184, 1)];
        let signed = signer().sign("ref-123", changes.clone()).unwrap();

        let claims = signer().verify(&signed.token).unwrap();
        assert_eq!(claims.iss, "api-key");
        assert_eq!(claims.sub, "ref-123");
        assert_eq!(claims.changes, changes);
        assert!(Uuid::parse_str(&claims.jti).is_ok());
    }

    #[test]
    fn test_each_token_has_unique_jti() {
        let changes = vec![Change::add_variant(1, 1)];
        let a = signer().verify(&signer().sign("ref", changes.clone()).unwrap().token).unwrap();
        let b = signer().verify(&signer().sign("ref", changes).unwrap().token).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = ChangesetSigner::new("api-key", Secret::from("different"));
        let signed = other.sign("ref", vec![Change::add_variant(1, 1)]).unwrap();
        assert!(signer().verify(&signed.token).is_err());
    }

    #[test]
    fn test_sign_rejects_empty_input() {
        assert!(matches!(signer().sign("", vec![Change::add_variant(1, 1)]), Err(SignError::MissingReference)));
        assert!(matches!(signer().sign("ref", vec![]), Err(SignError::NoChanges)));
    }
}
