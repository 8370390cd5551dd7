//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the forwarder produce:
//!     → logging.rs (structured tracing events, pretty or JSON)
//!     → metrics.rs (counters, histograms, process gauges)
//!
//! Consumers:
//!     → stdout
//!     → GET /metrics (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Each service owns its recorder; nothing is installed globally
//! - Request ID is attached to every request span
pub mod logging;
pub mod metrics;
