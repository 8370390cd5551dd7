//! Configuration schema definitions.
//!
//! This module defines the configuration structures for the gateway and the
//! downstream services. All types derive Serde traits for deserialization
//! from config files; environment overrides are applied by `loader.rs`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Target identifier for the authentication service.
pub const AUTH_TARGET: &str = "auth";
/// Target identifier for the booking service.
pub const BOOKING_TARGET: &str = "booking";

pub const DEFAULT_AUTH_SERVICE_URL: &str = "http://auth-service:3001";
pub const DEFAULT_BOOKING_SERVICE_URL: &str = "http://booking-service:3002";
pub const DEFAULT_DATABASE_URI: &str = "mongodb://mongodb:27017/vehicle-service-db";
pub const MONOLITH_DATABASE_URI: &str = "mongodb://localhost:27017/vehicle-service-db";

pub const GATEWAY_PORT: u16 = 3000;
pub const AUTH_SERVICE_PORT: u16 = 3001;
pub const BOOKING_SERVICE_PORT: u16 = 3002;
pub const MONOLITH_PORT: u16 = 3000;

/// Root configuration for the API gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Display name used by the health endpoint.
    pub name: String,

    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Downstream services keyed by identifier; values are base URLs.
    pub targets: BTreeMap<String, String>,

    /// Route rules, evaluated in order.
    pub routes: Vec<RouteConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let mut targets = BTreeMap::new();
        targets.insert(AUTH_TARGET.to_string(), DEFAULT_AUTH_SERVICE_URL.to_string());
        targets.insert(
            BOOKING_TARGET.to_string(),
            DEFAULT_BOOKING_SERVICE_URL.to_string(),
        );

        Self {
            name: "API Gateway".to_string(),
            listener: ListenerConfig::with_port(GATEWAY_PORT),
            targets,
            routes: RouteConfig::defaults(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port. Zero asks the OS for an ephemeral port.
    pub port: u16,
}

impl ListenerConfig {
    pub fn with_port(port: u16) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port,
        }
    }

    /// Socket address string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self::with_port(GATEWAY_PORT)
    }
}

/// Route rule mapping a set of literal paths to one target.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Route identifier for logging.
    pub name: String,

    /// Exact request paths owned by this route.
    pub paths: Vec<String>,

    /// Identifier of the target in `GatewayConfig::targets`.
    pub target: String,
}

impl RouteConfig {
    pub fn new(name: &str, paths: &[&str], target: &str) -> Self {
        Self {
            name: name.to_string(),
            paths: paths.iter().map(|p| p.to_string()).collect(),
            target: target.to_string(),
        }
    }

    /// The two standard rules: identity calls to auth, booking calls to booking.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("auth", &["/api/login", "/api/register"], AUTH_TARGET),
            Self::new(
                "booking",
                &["/api/bookings", "/api/bookService"],
                BOOKING_TARGET,
            ),
        ]
    }
}

/// Timeout configuration for upstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Time allowed for the upstream to produce response headers, in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 30,
        }
    }
}

/// Configuration shared by the auth, booking and monolith services.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub listener: ListenerConfig,

    /// Connection string of the persistence service.
    pub database_uri: String,

    /// Create the default admin identity on startup when it is missing.
    pub seed_admin: bool,
}

impl ServiceConfig {
    pub fn new(port: u16, database_uri: &str) -> Self {
        Self {
            listener: ListenerConfig::with_port(port),
            database_uri: database_uri.to_string(),
            seed_admin: true,
        }
    }

    pub fn auth() -> Self {
        Self::new(AUTH_SERVICE_PORT, DEFAULT_DATABASE_URI)
    }

    pub fn booking() -> Self {
        Self::new(BOOKING_SERVICE_PORT, DEFAULT_DATABASE_URI)
    }

    pub fn monolith() -> Self {
        Self::new(MONOLITH_PORT, MONOLITH_DATABASE_URI)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::auth()
    }
}
