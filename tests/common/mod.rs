//! Shared utilities for integration tests.
//!
//! Every server binds `127.0.0.1:0`, so tests never fight over ports.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;

use service_gateway::auth::{self, AuthService};
use service_gateway::booking::{self, BookingService};
use service_gateway::config::{GatewayConfig, TimeoutConfig};
use service_gateway::config::schema::{AUTH_TARGET, BOOKING_TARGET};
use service_gateway::observability::metrics::Metrics;
use service_gateway::store::MemoryStore;
use service_gateway::GatewayServer;

/// Serve `app` on an ephemeral local port.
pub async fn spawn_app(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Backend that describes the request it received.
///
/// The `x-echo-status` request header selects the response status.
pub async fn start_echo_backend() -> SocketAddr {
    async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
        let status = headers
            .get("x-echo-status")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u16>().ok())
            .and_then(|v| StatusCode::from_u16(v).ok())
            .unwrap_or(StatusCode::OK);
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        (
            status,
            [("x-backend", "echo")],
            Json(json!({
                "method": method.as_str(),
                "path": uri.path(),
                "query": uri.query(),
                "host": header("host"),
                "custom": header("x-custom"),
                "requestId": header("x-request-id"),
                "body": String::from_utf8_lossy(&body),
            })),
        )
    }

    spawn_app(Router::new().fallback(echo)).await
}

/// Backend that answers only after `delay`.
pub async fn start_slow_backend(delay: Duration) -> SocketAddr {
    let app = Router::new().fallback(move || async move {
        tokio::time::sleep(delay).await;
        "late"
    });
    spawn_app(app).await
}

pub fn gateway_config(auth: SocketAddr, booking: SocketAddr, upstream_secs: u64) -> GatewayConfig {
    let mut targets = BTreeMap::new();
    targets.insert(AUTH_TARGET.to_string(), format!("http://{auth}"));
    targets.insert(BOOKING_TARGET.to_string(), format!("http://{booking}"));

    GatewayConfig {
        targets,
        timeouts: TimeoutConfig {
            connect_secs: 1,
            upstream_secs,
        },
        ..GatewayConfig::default()
    }
}

/// Start a gateway in front of the given targets.
pub async fn spawn_gateway(auth: SocketAddr, booking: SocketAddr, upstream_secs: u64) -> SocketAddr {
    let server = GatewayServer::new(gateway_config(auth, booking, upstream_secs)).unwrap();
    spawn_app(server.router()).await
}

/// Start the real auth and booking services on one shared store.
pub async fn start_services() -> (SocketAddr, SocketAddr) {
    let store = Arc::new(MemoryStore::new());

    let auth_service = AuthService::new(store.clone());
    auth_service.seed_admin().await.unwrap();

    let auth_addr = spawn_app(auth::app(auth_service, Metrics::new(auth::AUTH_SERVICE_ID))).await;
    let booking_addr = spawn_app(booking::app(
        BookingService::new(store),
        Metrics::new(booking::BOOKING_SERVICE_ID),
    ))
    .await;
    (auth_addr, booking_addr)
}

/// A request body that passes booking validation.
pub fn valid_booking(package: &str) -> serde_json::Value {
    json!({
        "customerName": "Ravi Kumar",
        "packageName": package,
        "vehicleType": "Sedan",
        "totalPrice": 2499,
        "servicesIncluded": ["Oil change", "Wash"],
        "validityPeriod": "3 months",
        "contactNumber": "9876543210",
        "email": "ravi@example.com"
    })
}
