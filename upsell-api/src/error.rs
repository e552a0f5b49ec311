use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use upsell_catalog::CatalogError;
use upsell_core::{AuthError, SignError};

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    ValidationError(String),
    NotFoundError(String),
    InternalServerError(String),
}

impl AppError {
    pub fn catalog(err: CatalogError) -> Self {
        match err {
            CatalogError::OfferNotFound(_) => AppError::NotFoundError(err.to_string()),
            CatalogError::DuplicateOffer(_) => AppError::InternalServerError(err.to_string()),
        }
    }

    pub fn signing(err: SignError) -> Self {
        match err {
            SignError::MissingReference | SignError::NoChanges => AppError::ValidationError(err.to_string()),
            SignError::Encoding(msg) => AppError::InternalServerError(format!("Changeset signing failed: {}", msg)),
        }
    }

    pub fn auth(err: AuthError) -> Self {
        AppError::AuthenticationError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Malformed or mistyped request bodies
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}
