//! Operational endpoints shared by every service: liveness and metrics.

pub mod handlers;

use axum::{routing::get, Router};

use crate::http::method_not_allowed;
use crate::observability::metrics::Metrics;
use self::handlers::*;

/// `GET /health` answering `{"status": "<service_name> OK"}`.
pub fn health_router(service_name: &str) -> Router {
    Router::new()
        .route("/health", get(get_health).fallback(method_not_allowed))
        .with_state(HealthStatus {
            status: format!("{service_name} OK"),
        })
}

/// `GET /metrics` rendering `metrics`.
pub fn metrics_router(metrics: Metrics) -> Router {
    Router::new()
        .route("/metrics", get(get_metrics).fallback(method_not_allowed))
        .with_state(metrics)
}

/// Both operational endpoints.
pub fn setup_ops_router(service_name: &str, metrics: Metrics) -> Router {
    health_router(service_name).merge(metrics_router(metrics))
}
