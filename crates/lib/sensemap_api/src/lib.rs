//! # sensemap_api
//!
//! HTTP API library for the SenseMap proxy.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;

use axum::Router;
use axum::routing::{get, post};
use sensemap_core::SenseMapProxy;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{health, opensensemap};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upstream proxy. Read-only after construction.
    pub proxy: SenseMapProxy,
    /// API configuration.
    pub config: ApiConfig,
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::GET_API_HEALTH, get(health::health_handler))
        .route(routes::POST_REGISTER_USER, post(opensensemap::register_user_handler))
        .route(routes::POST_LOGIN, post(opensensemap::login_handler))
        .route(routes::GET_SENSEBOX_ID, get(opensensemap::get_sense_box_handler));

    // Protected routes (require a bearer token)
    let protected = Router::new()
        .route(routes::POST_SENSEBOX, post(opensensemap::create_sense_box_handler))
        .route(routes::POST_LOGOUT, post(opensensemap::logout_handler))
        .layer(axum::middleware::from_fn(middleware::auth::require_bearer));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .with_state(state)
}
