//! Bearer-token extraction for protected routes.
//!
//! The token is not verified locally; upstream decides whether it is valid.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::AppError;

/// Bearer token taken from the incoming request, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

/// Extracts the token from `Authorization: Bearer <token>`.
///
/// Fails when the header is missing, not valid ASCII, uses another scheme,
/// or carries an empty token.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization scheme".into()))?
        .trim();

    if token.is_empty() {
        return Err(AppError::Unauthorized("Empty bearer token".into()));
    }

    Ok(token)
}

/// Axum middleware: extracts the bearer token and injects [`BearerToken`]
/// into request extensions. Rejects with 401 before any handler runs.
pub async fn require_bearer(mut request: Request, next: Next) -> Result<Response, AppError> {
    let token = extract_bearer(request.headers())?.to_string();
    request.extensions_mut().insert(BearerToken(token));
    Ok(next.run(request).await)
}
