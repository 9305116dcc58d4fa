//! Health endpoint.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Configured upstream API root.
    pub upstream: String,
}

/// `GET /api/health` — liveness only; does not contact upstream.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: sensemap_core::version().to_string(),
        upstream: state.config.upstream.base_url.to_string(),
    })
}
