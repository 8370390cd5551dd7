//! Booking service: validated creation, listing and lookup of service bookings.
//!
//! # Endpoints
//! ```text
//! POST /api/bookService   → 201 | 400 (+details) | 500
//! GET  /api/bookings      → {success, count, bookings}, newest first
//! GET  /api/booking/{id}  → {success, booking} | 404
//! ```

pub mod handlers;
pub mod model;
pub mod service;
pub mod validation;

use axum::{routing::get, routing::post, Router};

use crate::http::{method_not_allowed, route_not_found, with_common_layers, RequestIdMode};
use crate::observability::metrics::Metrics;
use crate::ops::setup_ops_router;

pub use service::BookingService;

pub const BOOKING_SERVICE_NAME: &str = "Booking Service";
pub const BOOKING_SERVICE_ID: &str = "booking-service";

pub fn router(bookings: BookingService) -> Router {
    Router::new()
        .route("/api/bookService", post(handlers::book_service).fallback(method_not_allowed))
        .route("/api/bookings", get(handlers::list_bookings).fallback(method_not_allowed))
        .route("/api/booking/{id}", get(handlers::get_booking).fallback(method_not_allowed))
        .with_state(bookings)
}

pub fn app(bookings: BookingService, metrics: Metrics) -> Router {
    let app = setup_ops_router(BOOKING_SERVICE_NAME, metrics.clone())
        .merge(router(bookings))
        .fallback(route_not_found);
    with_common_layers(app, &metrics, RequestIdMode::Generate)
}
