//! HTTP client for the app server's offer endpoints.
//!
//! JSON over HTTPS with the checkout session token as bearer. Point it at a
//! mock server with [`HttpOfferBackend::new`] in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use upsell_shared::{Offer, OfferId};
use upsell_store::app_config::BackendConfig;

use crate::backend::{BackendError, OfferBackend, SignOutcome};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OfferRequest<'a> {
    reference_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct OfferResponse {
    offers: Vec<Offer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignRequest<'a> {
    reference_id: &'a str,
    changes: OfferId,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    token: String,
}

pub struct HttpOfferBackend {
    client: Client,
    base_url: Url,
}

impl HttpOfferBackend {
    pub fn new(app_url: &str, timeout_secs: u64) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        // Exactly one trailing slash so join() appends instead of replacing
        let normalised = format!("{}/", app_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| BackendError::InvalidUrl(format!("'{}': {}", app_url, e)))?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        Self::new(&config.app_url, config.timeout_seconds)
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::InvalidUrl(e.to_string()))
    }

    async fn post<B, R>(&self, path: &str, token: &str, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(path)?)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<R>().await?)
    }
}

#[async_trait]
impl OfferBackend for HttpOfferBackend {
    async fn fetch_offers(&self, token: &str, reference_id: &str) -> Result<Vec<Offer>, BackendError> {
        let response: OfferResponse = self
            .post("api/offer", token, &OfferRequest { reference_id })
            .await?;
        Ok(response.offers)
    }

    async fn sign_changeset(&self, token: &str, reference_id: &str, offer_id: OfferId) -> SignOutcome {
        let result = self
            .post::<_, SignResponse>(
                "api/sign-changeset",
                token,
                &SignRequest {
                    reference_id,
                    changes: offer_id,
                },
            )
            .await
            .map(|r| r.token);

        if let Err(e) = &result {
            tracing::warn!(reference_id, offer_id, "Changeset signing failed: {}", e);
        }
        result.into()
    }
}
