//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sensemap_core::ProxyError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// No usable bearer token on the incoming request.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::AuthenticationFailed(m) => {
                (StatusCode::UNAUTHORIZED, "authentication_failed", m.as_str())
            }
            AppError::Upstream(m) => (StatusCode::BAD_GATEWAY, "upstream_error", m.as_str()),
            AppError::MalformedResponse(m) => {
                (StatusCode::BAD_GATEWAY, "malformed_response", m.as_str())
            }
            AppError::UpstreamUnavailable(m) => {
                (StatusCode::SERVICE_UNAVAILABLE, "upstream_unavailable", m.as_str())
            }
            AppError::Internal(m) => {
                error!("internal error: {m}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<ProxyError> for AppError {
    fn from(e: ProxyError) -> Self {
        let message = e.to_string();
        match e {
            ProxyError::Authentication { .. } => AppError::AuthenticationFailed(message),
            ProxyError::Upstream { .. } => AppError::Upstream(message),
            ProxyError::MalformedResponse { .. } => AppError::MalformedResponse(message),
            ProxyError::Transport(_) => AppError::UpstreamUnavailable(message),
            ProxyError::InvalidBoxId(_) => AppError::Validation(message),
            ProxyError::InvalidUrl(_) => AppError::Internal(message),
        }
    }
}
