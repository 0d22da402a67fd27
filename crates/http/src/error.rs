//! HTTP error types and response mapping

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use confect_core::ApiEnvelope;
use thiserror::Error;

/// HTTP-specific errors
///
/// These cover caller-side and configuration faults. Upstream HTTP
/// failures never surface here; the gateway folds those into failure
/// envelopes instead.
#[derive(Error, Debug)]
pub enum HttpError {
    /// Bad request (malformed caller input)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    InternalServerError(String),

    /// Service unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match &self {
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            HttpError::Configuration(_) | HttpError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            HttpError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body: ApiEnvelope = ApiEnvelope::failure(status.as_u16(), self.to_string());
        (status, Json(body)).into_response()
    }
}

/// Result type alias using HttpError
pub type Result<T> = std::result::Result<T, HttpError>;
