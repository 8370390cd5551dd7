//! Identity service: registration and login.
//!
//! # Endpoints
//! ```text
//! POST /api/register  {name, email, password}  → 201 | 400
//! POST /api/login     {email, password}        → 200 + token | 400 | 401
//! ```

pub mod handlers;
pub mod model;
pub mod service;

use axum::{routing::post, Router};

use crate::http::{method_not_allowed, route_not_found, with_common_layers, RequestIdMode};
use crate::observability::metrics::Metrics;
use crate::ops::setup_ops_router;

pub use service::AuthService;

/// Display name used in the liveness payload.
pub const AUTH_SERVICE_NAME: &str = "Auth Service";
/// Metrics `service` label.
pub const AUTH_SERVICE_ID: &str = "auth-service";

/// Auth routes with their state applied.
pub fn router(auth: AuthService) -> Router {
    Router::new()
        .route("/api/register", post(handlers::register).fallback(method_not_allowed))
        .route("/api/login", post(handlers::login).fallback(method_not_allowed))
        .with_state(auth)
}

/// The complete auth service application: API, ops endpoints and shared layers.
pub fn app(auth: AuthService, metrics: Metrics) -> Router {
    let app = setup_ops_router(AUTH_SERVICE_NAME, metrics.clone())
        .merge(router(auth))
        .fallback(route_not_found);
    with_common_layers(app, &metrics, RequestIdMode::Generate)
}
