//! openSenseMap proxy handlers.
//!
//! Each handler forwards to exactly one [`sensemap_core::SenseMapProxy`]
//! operation. Protected handlers receive their token from
//! [`crate::middleware::auth::require_bearer`].

use axum::extract::{Path, State};
use axum::{Extension, Json};
use sensemap_core::ProxyError;
use sensemap_core::models::{
    LoginRequest, LoginResult, LogoutResponse, SenseBox, SenseBoxCreated, SenseBoxSpec,
    UserCredentials,
};
use tracing::info;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::BearerToken;

/// `POST /opensensemap/registerUser` — register a user upstream.
///
/// Answers 200 with plain text either way: the upstream body on success, or
/// `"Error: <status> - <body>"` when upstream refuses. Only transport and
/// configuration failures become error responses.
pub async fn register_user_handler(
    State(state): State<AppState>,
    Json(body): Json<UserCredentials>,
) -> AppResult<String> {
    match state.proxy.register_user(&body).await {
        Ok(text) => Ok(text),
        Err(ProxyError::Upstream { status, body, .. }) => Ok(format!("Error: {status} - {body}")),
        Err(e) => Err(e.into()),
    }
}

/// `POST /opensensemap/login` — exchange credentials for a bearer token.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<LoginResult>> {
    let result = state.proxy.login_user(&body).await?;
    Ok(Json(result))
}

/// `POST /opensensemap/sensebox` — create a SenseBox. Requires authentication.
pub async fn create_sense_box_handler(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
    Json(body): Json<SenseBoxSpec>,
) -> AppResult<Json<SenseBoxCreated>> {
    let created = state.proxy.create_sense_box(&body, &token).await?;
    info!(box_id = %created.id, "SenseBox created");
    Ok(Json(created))
}

/// `GET /opensensemap/sensebox/{id}` — fetch a SenseBox.
pub async fn get_sense_box_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SenseBox>> {
    let sense_box = state.proxy.get_sense_box_by_id(&id).await?;
    Ok(Json(sense_box))
}

/// `POST /opensensemap/logout` — invalidate the token upstream. Requires
/// authentication.
pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
) -> AppResult<Json<LogoutResponse>> {
    let success = state.proxy.logout(&token).await?;
    Ok(Json(LogoutResponse {
        message: "User logged out successfully".into(),
        success,
    }))
}
