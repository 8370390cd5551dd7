//! Service gateway library
//!
//! An API gateway fronting an auth service and a booking service, plus the
//! services themselves and a single-process backend combining both.

pub mod auth;
pub mod booking;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod monolith;
pub mod observability;
pub mod ops;
pub mod routing;
pub mod store;

pub use config::schema::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
