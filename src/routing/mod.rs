//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (ordered rule scan)
//!     → matcher.rs (literal path membership)
//!     → Return: ServiceTarget or NoMatch
//!
//! Route compilation (at startup):
//!     GatewayConfig { targets, routes }
//!     → validate (fail fast on absent/invalid target URLs)
//!     → resolve targets (URL, authority, Host header)
//!     → freeze as immutable RouteTable
//! ```

pub mod matcher;
pub mod router;

pub use matcher::{ExactPathMatcher, Matcher};
pub use router::{RouteRule, RouteTable, ServiceTarget};
