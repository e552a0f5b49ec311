use std::sync::Arc;
use upsell_catalog::PricingAuthority;
use upsell_core::{ChangesetSigner, SessionVerifier};
use upsell_store::Config;

#[derive(Clone)]
pub struct AppState {
    pub authority: Arc<dyn PricingAuthority>,
    pub signer: ChangesetSigner,
    pub sessions: SessionVerifier,
}

impl AppState {
    pub fn new(config: &Config, authority: Arc<dyn PricingAuthority>) -> Self {
        Self {
            authority,
            signer: ChangesetSigner::new(config.auth.api_key.clone(), config.auth.api_secret.clone()),
            sessions: SessionVerifier::new(config.auth.api_key.clone(), config.auth.api_secret.clone()),
        }
    }
}
