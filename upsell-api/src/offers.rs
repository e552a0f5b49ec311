use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use upsell_core::SessionClaims;
use upsell_shared::{Offer, OfferId};

use crate::{error::AppError, middleware::session_auth_middleware, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRequest {
    pub reference_id: String,
}

#[derive(Debug, Serialize)]
pub struct OfferResponse {
    pub offers: Vec<Offer>,
}

/// `changes` is the offer id. The changes themselves are looked up here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignChangesetRequest {
    pub reference_id: String,
    pub changes: OfferId,
}

#[derive(Debug, Serialize)]
pub struct SignChangesetResponse {
    pub token: String,
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/offer", post(get_offers))
        .route("/api/sign-changeset", post(sign_changeset))
        .route_layer(axum::middleware::from_fn_with_state(state, session_auth_middleware))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/offer
/// Offers to show after checkout for this purchase
pub async fn get_offers(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    payload: Result<Json<OfferRequest>, JsonRejection>,
) -> Result<Json<OfferResponse>, AppError> {
    let Json(req) = payload?;
    if req.reference_id.is_empty() {
        return Err(AppError::ValidationError("referenceId is required".to_string()));
    }

    let offers = state
        .authority
        .offers_for(&req.reference_id)
        .await
        .map_err(AppError::catalog)?;

    tracing::info!(
        reference_id = %req.reference_id,
        shop = claims.dest.as_deref().unwrap_or("unknown"),
        count = offers.len(),
        "Serving post-purchase offers"
    );

    Ok(Json(OfferResponse { offers }))
}

/// POST /api/sign-changeset
/// Sign the server's own copy of an offer's changes
pub async fn sign_changeset(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    payload: Result<Json<SignChangesetRequest>, JsonRejection>,
) -> Result<Json<SignChangesetResponse>, AppError> {
    let Json(req) = payload?;
    let changes = state
        .authority
        .changes_for(&req.reference_id, req.changes)
        .await
        .map_err(|e| {
            tracing::warn!(reference_id = %req.reference_id, offer_id = req.changes, "Refusing to sign: {}", e);
            AppError::catalog(e)
        })?;

    let signed = state
        .signer
        .sign(&req.reference_id, changes)
        .map_err(AppError::signing)?;

    tracing::info!(
        reference_id = %req.reference_id,
        offer_id = req.changes,
        shop = claims.dest.as_deref().unwrap_or("unknown"),
        "Changeset signed"
    );

    Ok(Json(SignChangesetResponse { token: signed.token }))
}
