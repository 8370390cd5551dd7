use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::observability::metrics::{Metrics, PROMETHEUS_CONTENT_TYPE};

/// Static liveness payload.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: String,
}

/// `GET /health`: constant while the process is alive, never checks dependencies.
pub async fn get_health(State(status): State<HealthStatus>) -> Json<HealthStatus> {
    Json(status)
}

/// `GET /metrics`: Prometheus text exposition of the process registry.
pub async fn get_metrics(State(metrics): State<Metrics>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        metrics.render(),
    )
}
