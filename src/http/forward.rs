//! Request forwarding to downstream targets.
//!
//! # Responsibilities
//! - Rewrite the request URI and `Host` header for the resolved target
//! - Relay method, headers and streaming body unchanged
//! - Relay the upstream status, headers and body verbatim
//! - Turn connect failures into 502 and slow upstreams into 504
//!
//! # Design Decisions
//! - No retries, no circuit breaking: one failed upstream call fails the request
//! - The timeout covers the wait for response headers; bodies stream afterwards

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, Version},
    response::Response,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::TimeoutConfig;
use crate::http::request::RequestIdExt;
use crate::http::response::ApiError;
use crate::observability::metrics::Metrics;
use crate::routing::ServiceTarget;

/// Pass-through HTTP forwarder shared by all gateway handlers.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
    metrics: Metrics,
}

impl Forwarder {
    pub fn new(timeouts: &TimeoutConfig, metrics: Metrics) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            timeout: Duration::from_secs(timeouts.upstream_secs),
            metrics,
        }
    }

    /// Forward `request` to `target` and return the upstream response.
    pub async fn forward(
        &self,
        request: Request<Body>,
        target: &ServiceTarget,
    ) -> Result<Response, ApiError> {
        let (mut parts, body) = request.into_parts();
        let request_id = parts.headers.request_id().to_string();
        let method = parts.method.clone();
        let path = parts.uri.path().to_string();

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        parts.uri = target.upstream_uri(path_and_query).map_err(|e| {
            ApiError::internal("Failed to build upstream request", e)
        })?;
        parts.headers.insert(header::HOST, target.host_header().clone());
        // The pooled client speaks HTTP/1.1 to targets whatever the inbound version was.
        parts.version = Version::HTTP_11;

        tracing::info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            target = %target.name(),
            "Forwarding request"
        );

        let upstream = Request::from_parts(parts, body);
        match tokio::time::timeout(self.timeout, self.client.request(upstream)).await {
            Ok(Ok(response)) => {
                let status = response.status();
                tracing::debug!(
                    request_id = %request_id,
                    target = %target.name(),
                    status = status.as_u16(),
                    "Upstream responded"
                );
                self.metrics.record_forward(target.name(), status.as_u16());
                Ok(response.map(Body::new))
            }
            Ok(Err(e)) => {
                tracing::error!(
                    request_id = %request_id,
                    target = %target.name(),
                    error = %e,
                    "Upstream request failed"
                );
                self.metrics.record_upstream_error(target.name(), "connect");
                Err(ApiError::BadGateway {
                    target: target.name().to_string(),
                })
            }
            Err(_) => {
                tracing::error!(
                    request_id = %request_id,
                    target = %target.name(),
                    timeout = ?self.timeout,
                    "Upstream request timed out"
                );
                self.metrics.record_upstream_error(target.name(), "timeout");
                Err(ApiError::GatewayTimeout {
                    target: target.name().to_string(),
                })
            }
        }
    }
}
