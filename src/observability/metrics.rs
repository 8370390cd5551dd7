//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Own one Prometheus recorder per process (constructed at startup, injected into handlers)
//! - Record HTTP, forwarding and process metrics through the `metrics` macros
//! - Render the registry in the Prometheus text exposition format
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, status
//! - `http_request_duration_seconds` (histogram): latency by method
//! - `gateway_forwarded_requests_total` (counter): forwarded requests by target, status
//! - `gateway_upstream_errors_total` (counter): failed upstream calls by target, kind
//! - `process_*` OS series from `metrics-process` (CPU seconds, resident
//!   memory, open fds, threads, start time), collected on every scrape
//! - `process_uptime_seconds` (gauge): refreshed on every scrape
//!
//! Every series carries a `service` label naming the emitting binary.
//!
//! # Design Decisions
//! - The recorder is never installed globally; macros run under
//!   `metrics::with_local_recorder` so tests can build isolated instances

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use metrics_process::Collector;

/// Media type of the Prometheus text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
pub const GATEWAY_FORWARDED_REQUESTS_TOTAL: &str = "gateway_forwarded_requests_total";
pub const GATEWAY_UPSTREAM_ERRORS_TOTAL: &str = "gateway_upstream_errors_total";
pub const PROCESS_START_TIME_SECONDS: &str = "process_start_time_seconds";
pub const PROCESS_UPTIME_SECONDS: &str = "process_uptime_seconds";
pub const PROCESS_CPU_SECONDS_TOTAL: &str = "process_cpu_seconds_total";
pub const PROCESS_RESIDENT_MEMORY_BYTES: &str = "process_resident_memory_bytes";
pub const PROCESS_OPEN_FDS: &str = "process_open_fds";

/// Process-scoped metrics registry.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
    process: Collector,
    started: Instant,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("uptime", &self.inner.started.elapsed())
            .finish_non_exhaustive()
    }
}

impl Metrics {
    /// Create a registry whose series are labelled with `service`.
    pub fn new(service: &str) -> Self {
        let recorder = PrometheusBuilder::new()
            .add_global_label("service", service)
            .build_recorder();
        let handle = recorder.handle();

        let metrics = Self {
            inner: Arc::new(MetricsInner {
                recorder,
                handle,
                process: Collector::default(),
                started: Instant::now(),
            }),
        };
        metrics.describe();
        metrics
    }

    fn with_recorder<T>(&self, f: impl FnOnce() -> T) -> T {
        metrics::with_local_recorder(&self.inner.recorder, f)
    }

    fn describe(&self) {
        self.with_recorder(|| {
            describe_counter!(HTTP_REQUESTS_TOTAL, Unit::Count, "Total HTTP requests handled.");
            describe_histogram!(
                HTTP_REQUEST_DURATION_SECONDS,
                Unit::Seconds,
                "Latency of HTTP requests handled."
            );
            describe_counter!(
                GATEWAY_FORWARDED_REQUESTS_TOTAL,
                Unit::Count,
                "Requests relayed to a downstream target."
            );
            describe_counter!(
                GATEWAY_UPSTREAM_ERRORS_TOTAL,
                Unit::Count,
                "Upstream calls that failed or timed out."
            );
            describe_gauge!(PROCESS_UPTIME_SECONDS, Unit::Seconds, "Process uptime.");
            self.inner.process.describe();
            self.inner.process.collect();
        });
    }

    /// Record a handled inbound request.
    pub fn record_request(&self, method: &str, status: u16, elapsed: Duration) {
        self.with_recorder(|| {
            counter!(
                HTTP_REQUESTS_TOTAL,
                "method" => method.to_string(),
                "status" => status.to_string()
            )
            .increment(1);
            histogram!(HTTP_REQUEST_DURATION_SECONDS, "method" => method.to_string())
                .record(elapsed.as_secs_f64());
        });
    }

    /// Record a response relayed from a downstream target.
    pub fn record_forward(&self, target: &str, status: u16) {
        self.with_recorder(|| {
            counter!(
                GATEWAY_FORWARDED_REQUESTS_TOTAL,
                "target" => target.to_string(),
                "status" => status.to_string()
            )
            .increment(1);
        });
    }

    /// Record a failed upstream call (`kind` is `connect` or `timeout`).
    pub fn record_upstream_error(&self, target: &str, kind: &'static str) {
        self.with_recorder(|| {
            counter!(
                GATEWAY_UPSTREAM_ERRORS_TOTAL,
                "target" => target.to_string(),
                "kind" => kind
            )
            .increment(1);
        });
    }

    /// Render the registry in the Prometheus text format.
    pub fn render(&self) -> String {
        let uptime = self.inner.started.elapsed().as_secs_f64();
        self.with_recorder(|| {
            self.inner.process.collect();
            gauge!(PROCESS_UPTIME_SECONDS).set(uptime);
        });
        self.inner.handle.render()
    }
}

/// Middleware recording `http_requests_total` and request latency.
pub async fn track_requests(
    State(metrics): State<Metrics>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();

    let response = next.run(request).await;

    metrics.record_request(method.as_str(), response.status().as_u16(), start.elapsed());
    response
}
