use std::sync::Arc;

use upsell_shared::{format_currency, money_line, CalculatedPurchase, Offer, OfferId, PriceSummary};

use crate::backend::{OfferBackend, SignOutcome};
use crate::eligibility::{should_render, ExtensionStorage, InputData, OfferPayload, ShouldRender};
use crate::platform::{CheckoutPlatform, PlatformError};

/// Where a post-purchase session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Eligible,
    PricingCalculated,
    Accepting,
    Applied,
    Declined,
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Applied | FlowState::Declined)
    }
}

/// Ephemeral view state: dies with the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSession {
    pub loading: bool,
    pub calculated_purchase: Option<CalculatedPurchase>,
}

impl Default for FlowSession {
    fn default() -> Self {
        Self {
            loading: true,
            calculated_purchase: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// Changeset applied; the flow is finished
    Applied,
    /// Nothing was applied. The customer may retry or decline.
    Retryable(String),
}

/// Everything the offer page shows, already formatted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferView {
    pub complement_to: Option<String>,
    pub product_title: String,
    pub product_image_url: String,
    pub description: Vec<String>,
    pub discount_title: Option<String>,
    /// Empty while loading
    pub discounted_price: String,
    /// Empty while loading
    pub original_price: String,
    pub subtotal: String,
    pub shipping: String,
    pub taxes: String,
    pub total: String,
    pub pay_label: String,
    pub loading: bool,
    pub error: Option<String>,
}

/// Orchestrates one post-purchase offer: price it, then accept or decline.
///
/// Prices come only from the platform's changeset calculation and the token
/// handed to apply comes only from the app server.
pub struct PostPurchaseFlow {
    platform: Arc<dyn CheckoutPlatform>,
    backend: Arc<dyn OfferBackend>,
    input: InputData,
    offers: Vec<Offer>,
    selected: usize,
    state: FlowState,
    session: FlowSession,
    last_error: Option<String>,
    completed: bool,
}

impl PostPurchaseFlow {
    /// A flow that has not checked eligibility yet
    pub fn new(input: InputData, platform: Arc<dyn CheckoutPlatform>, backend: Arc<dyn OfferBackend>) -> Self {
        Self {
            platform,
            backend,
            input,
            offers: Vec::new(),
            selected: 0,
            state: FlowState::Idle,
            session: FlowSession::default(),
            last_error: None,
            completed: false,
        }
    }

    /// Render step: pick up the offers stored by the eligibility step
    pub fn mount(
        storage: &ExtensionStorage,
        input: InputData,
        platform: Arc<dyn CheckoutPlatform>,
        backend: Arc<dyn OfferBackend>,
    ) -> Result<Self, FlowError> {
        let payload = storage.initial_data().ok_or(FlowError::NoOffer)?;
        let mut flow = Self::new(input, platform, backend);
        flow.load(payload.clone())?;
        Ok(flow)
    }

    /// Idle → Eligible. A failed fetch leaves the flow idle and says "don't render".
    pub async fn check_eligibility(&mut self, storage: &mut ExtensionStorage) -> Result<ShouldRender, FlowError> {
        self.ensure_state(&[FlowState::Idle], FlowState::Eligible)?;

        let decision = should_render(self.backend.as_ref(), &self.input, storage).await;
        if decision.render {
            if let Some(payload) = storage.initial_data() {
                self.load(payload.clone())?;
            }
        }
        Ok(decision)
    }

    fn load(&mut self, payload: OfferPayload) -> Result<(), FlowError> {
        if payload.offers.is_empty() {
            return Err(FlowError::NoOffer);
        }
        self.offers = payload.offers;
        self.selected = 0;
        self.session = FlowSession::default();
        self.state = FlowState::Eligible;
        Ok(())
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn session(&self) -> &FlowSession {
        &self.session
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn selected_offer(&self) -> Option<&Offer> {
        self.offers.get(self.selected)
    }

    pub fn price_summary(&self) -> Option<PriceSummary> {
        self.session.calculated_purchase.as_ref().map(PriceSummary::from_purchase)
    }

    /// Switch to another offer. Its prices have to be calculated again.
    pub fn select_offer(&mut self, offer_id: OfferId) -> Result<(), FlowError> {
        self.ensure_state(&[FlowState::Eligible, FlowState::PricingCalculated], FlowState::Eligible)?;

        let idx = self
            .offers
            .iter()
            .position(|o| o.id == offer_id)
            .ok_or(FlowError::OfferNotFound(offer_id))?;

        self.selected = idx;
        self.session = FlowSession::default();
        self.last_error = None;
        self.state = FlowState::Eligible;
        Ok(())
    }

    /// Eligible → PricingCalculated
    pub async fn calculate(&mut self) -> Result<&CalculatedPurchase, FlowError> {
        self.ensure_state(&[FlowState::Eligible], FlowState::PricingCalculated)?;
        let offer = self.selected_offer().ok_or(FlowError::NoOffer)?;

        let purchase = self
            .platform
            .calculate_changeset(&offer.changes)
            .await
            .map_err(FlowError::Calculate)?;

        self.session.loading = false;
        self.state = FlowState::PricingCalculated;

        Ok(&*self.session.calculated_purchase.insert(purchase))
    }

    /// PricingCalculated → Accepting → Applied.
    ///
    /// The server signs first. Without a signed token nothing is applied and
    /// the flow drops back to PricingCalculated so the customer can retry or
    /// decline.
    pub async fn accept(&mut self) -> Result<AcceptOutcome, FlowError> {
        self.ensure_state(&[FlowState::PricingCalculated], FlowState::Accepting)?;
        let offer_id = self.selected_offer().ok_or(FlowError::NoOffer)?.id;

        self.state = FlowState::Accepting;
        self.session.loading = true;
        self.last_error = None;

        let token = match self
            .backend
            .sign_changeset(&self.input.token, &self.input.initial_purchase.reference_id, offer_id)
            .await
        {
            SignOutcome::Signed(token) => token,
            SignOutcome::Failed(reason) => {
                tracing::warn!(offer_id, "Not applying offer, signing failed: {}", reason);
                return Ok(self.back_off(format!("Could not authorise this offer: {}", reason)));
            }
        };

        if let Err(e) = self.platform.apply_changeset(&token).await {
            tracing::warn!(offer_id, "Changeset apply failed: {}", e);
            return Ok(self.back_off(format!("Could not apply this offer: {}", e)));
        }

        tracing::info!(offer_id, "Offer accepted");
        self.state = FlowState::Applied;
        self.finish().await;
        Ok(AcceptOutcome::Applied)
    }

    /// Skip the offer. No signing, no apply.
    pub async fn decline(&mut self) -> Result<(), FlowError> {
        self.ensure_state(&[FlowState::Eligible, FlowState::PricingCalculated], FlowState::Declined)?;

        self.session.loading = true;
        self.state = FlowState::Declined;
        self.finish().await;
        Ok(())
    }

    fn back_off(&mut self, reason: String) -> AcceptOutcome {
        self.state = FlowState::PricingCalculated;
        self.session.loading = false;
        self.last_error = Some(reason.clone());
        AcceptOutcome::Retryable(reason)
    }

    async fn finish(&mut self) {
        if self.completed {
            return;
        }
        self.completed = true;
        self.platform.done().await;
    }

    fn ensure_state(&self, allowed: &[FlowState], to: FlowState) -> Result<(), FlowError> {
        if self.state.is_terminal() {
            return Err(FlowError::Finished);
        }
        if !allowed.contains(&self.state) {
            return Err(FlowError::InvalidTransition {
                from: format!("{:?}", self.state),
                to: format!("{:?}", to),
            });
        }
        Ok(())
    }

    /// Formatted page content for the selected offer
    pub fn view(&self) -> Option<OfferView> {
        let offer = self.selected_offer()?;
        let loading = self.session.calculated_purchase.is_none();
        let summary = self.price_summary().unwrap_or_default();

        let header = |amount: Option<&upsell_shared::Amount>| {
            if loading {
                String::new()
            } else {
                format_currency(amount)
            }
        };

        let total = money_line(summary.total.as_ref(), loading);

        Some(OfferView {
            complement_to: self
                .input
                .initial_purchase
                .line_items
                .first()
                .map(|l| l.product.title.clone()),
            product_title: offer.product_title.clone(),
            product_image_url: offer.product_image_url.clone(),
            description: offer.product_description.clone(),
            discount_title: offer.discount_title().map(str::to_string),
            discounted_price: header(summary.discounted_price.as_ref()),
            original_price: header(summary.original_price.as_ref()),
            subtotal: money_line(summary.discounted_price.as_ref(), loading),
            shipping: money_line(summary.shipping.as_ref(), loading),
            taxes: money_line(summary.taxes.as_ref(), loading),
            pay_label: format!("Pay now · {}", total),
            total,
            loading: self.session.loading,
            error: self.last_error.clone(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("No offer available for this purchase")]
    NoOffer,

    #[error("Offer not found: {0}")]
    OfferNotFound(OfferId),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Post-purchase flow already finished")]
    Finished,

    #[error(transparent)]
    Calculate(PlatformError),
}
