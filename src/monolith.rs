//! Single-process backend serving the auth and booking APIs together.
//!
//! Unlike the split services, its `/health` reports store connectivity and
//! `GET /` describes the available endpoints.

use axum::{extract::State, routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::{self, AuthService};
use crate::booking::{self, BookingService};
use crate::http::{method_not_allowed, route_not_found, with_common_layers, RequestIdMode};
use crate::observability::metrics::Metrics;
use crate::ops::metrics_router;

pub const MONOLITH_SERVICE_ID: &str = "vehicle-backend";

#[derive(Debug, Clone, Serialize)]
pub struct BackendHealth {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: String,
    pub database: &'static str,
}

/// `GET /health` including store connectivity.
async fn get_health(State(bookings): State<BookingService>) -> Json<BackendHealth> {
    let database = if bookings.store_reachable().await {
        "Connected"
    } else {
        "Disconnected"
    };
    Json(BackendHealth {
        status: "OK",
        message: "Vehicle Service API is running",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        database,
    })
}

async fn get_index() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Vehicle Service Package API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "register": "POST /api/register",
            "login": "POST /api/login",
            "bookService": "POST /api/bookService",
            "getAllBookings": "GET /api/bookings",
            "getBookingById": "GET /api/booking/:id"
        }
    }))
}

pub fn app(auth: AuthService, bookings: BookingService, metrics: Metrics) -> Router {
    let ops = Router::new()
        .route("/health", get(get_health).fallback(method_not_allowed))
        .with_state(bookings.clone())
        .route("/", get(get_index).fallback(method_not_allowed))
        .merge(metrics_router(metrics.clone()));

    let app = ops
        .merge(auth::router(auth))
        .merge(booking::router(bookings))
        .fallback(route_not_found);
    with_common_layers(app, &metrics, RequestIdMode::Generate)
}
