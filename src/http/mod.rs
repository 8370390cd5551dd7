//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, shared layers)
//!     → request.rs (request id)
//!     → routing layer resolves the target
//!     → forward.rs (rewrite Host/URI, relay)
//!     → response.rs (error envelope for local failures)
//!     → Send to client
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use forward::Forwarder;
pub use request::{RequestIdExt, RequestIdMode, X_REQUEST_ID};
pub use response::{method_not_allowed, route_not_found, ApiError};
pub use server::{serve, with_common_layers, GatewayServer};
