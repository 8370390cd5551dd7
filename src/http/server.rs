//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the gateway Axum router: ops endpoints plus the dispatch fallback
//! - Wire up middleware shared by every service (tracing, CORS, request id, metrics)
//! - Dispatch requests through the route table to the forwarder
//! - Serve a router on a listener until shutdown is signalled

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{ConfigError, GatewayConfig};
use crate::http::forward::Forwarder;
use crate::http::request::{with_request_id, RequestIdExt, RequestIdMode};
use crate::http::response::ApiError;
use crate::observability::metrics::{track_requests, Metrics};
use crate::ops::setup_ops_router;
use crate::routing::RouteTable;

/// Metrics `service` label of the gateway.
pub const GATEWAY_SERVICE: &str = "api-gateway";

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct GatewayState {
    pub routes: Arc<RouteTable>,
    pub forwarder: Forwarder,
}

/// HTTP server for the API gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
    metrics: Metrics,
}

impl GatewayServer {
    /// Build the gateway. Fails when the route table cannot be compiled.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        let routes = Arc::new(RouteTable::from_config(&config)?);
        for rule in routes.rules() {
            tracing::info!(
                route = rule.name(),
                target = rule.target().name(),
                base_url = %rule.target().base_url(),
                "Route registered"
            );
        }

        let metrics = Metrics::new(GATEWAY_SERVICE);
        let forwarder = Forwarder::new(&config.timeouts, metrics.clone());
        let state = GatewayState { routes, forwarder };

        let router = Self::build_router(&config, state, &metrics);
        Ok(Self {
            router,
            config,
            metrics,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: GatewayState, metrics: &Metrics) -> Router {
        let proxy = Router::new().fallback(dispatch).with_state(state);
        let app = setup_ops_router(&config.name, metrics.clone()).merge(proxy);

        // Forwarded requests must leave untouched, so ids are only propagated here.
        with_common_layers(app, metrics, RequestIdMode::Propagate)
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        serve(listener, self.router, shutdown).await
    }
}

/// Single deterministic dispatch: resolve the path, then forward or 404.
async fn dispatch(State(state): State<GatewayState>, request: Request<Body>) -> Response {
    let path = request.uri().path().to_string();

    let Some(target) = state.routes.resolve(&path) else {
        tracing::warn!(
            request_id = %request.request_id(),
            method = %request.method(),
            path = %path,
            "No route matched"
        );
        return ApiError::RouteNotFound { path }.into_response();
    };

    match state.forwarder.forward(request, target).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

/// Layers shared by the gateway and the downstream services.
pub fn with_common_layers(router: Router, metrics: &Metrics, ids: RequestIdMode) -> Router {
    let router = router
        .layer(middleware::from_fn_with_state(metrics.clone(), track_requests))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "http",
                    method = %req.method(),
                    path = %req.uri().path(),
                    request_id = %req.request_id(),
                )
            }),
        );
    with_request_id(router, ids)
}

/// Serve `app` on `listener` until a value arrives on `shutdown`.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "HTTP server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
