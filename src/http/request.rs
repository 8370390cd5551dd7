//! Request identification.
//!
//! # Responsibilities
//! - Generate a UUID v4 `x-request-id` for requests that arrive without one
//! - Echo the request id on the response
//! - Expose the id to handlers and log spans
//!
//! # Design Decisions
//! - The gateway only propagates ids; generation happens in the services,
//!   so forwarded requests are not modified beyond the `Host` header

use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, Request},
    Router,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Access to the request id carried in headers.
pub trait RequestIdExt {
    /// The request id, or `"-"` when none is present.
    fn request_id(&self) -> &str;
}

impl RequestIdExt for HeaderMap {
    fn request_id(&self) -> &str {
        self.get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
    }
}

impl RequestIdExt for Request<Body> {
    fn request_id(&self) -> &str {
        self.headers().request_id()
    }
}

/// How a router treats request ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestIdMode {
    /// Assign an id when missing, then echo it.
    Generate,
    /// Only echo an id supplied by the caller.
    Propagate,
}

/// Apply request id layers. Must be added after the trace layer so the span sees the id.
pub fn with_request_id(router: Router, mode: RequestIdMode) -> Router {
    let router = router.layer(PropagateRequestIdLayer::new(X_REQUEST_ID));
    match mode {
        RequestIdMode::Generate => {
            router.layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
        }
        RequestIdMode::Propagate => router,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_lookup() {
        let req = Request::builder()
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(req.request_id(), "abc-123");

        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(req.request_id(), "-");
    }
}
