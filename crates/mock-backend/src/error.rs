//! Error types for the mock backend.
//!
//! [`BackendError`] implements [`IntoResponse`] so handlers can return
//! `Result<…, BackendError>` directly. Every error body is
//! `{"error": "<message>"}`, which the SDK reads back into its own errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use helpdesk_models::Integration;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Missing, malformed or unknown bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Wrong email or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The integration is not set up for this user.
    #[error("{} is not configured", .0.product_name())]
    NotConfigured(Integration),

    /// Malformed request body or parameters.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(String),

    /// The email is already registered.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized(_) | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::NotConfigured(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
        };
        let message = self.to_string();

        tracing::warn!(%status, error = %message, "request failed");
        (status, Json(json!({ "error": message }))).into_response()
    }
}
