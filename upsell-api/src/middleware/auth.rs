use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use upsell_core::AuthError;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Checkout Session Middleware
// ============================================================================

/// Requires a valid checkout session token as bearer and injects its claims.
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 1. Extract token from Authorization header
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| AppError::auth(AuthError::MissingToken))?;

    // 2. Verify signature, expiry and audience
    let claims = state.sessions.verify(bearer.token()).map_err(AppError::auth)?;

    // 3. Inject claims into request extensions
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
