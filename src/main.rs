//! API gateway
//!
//! ```text
//!     Client ──▶ /health, /metrics                  (answered locally)
//!            ──▶ /api/login, /api/register    ──▶ auth service
//!            ──▶ /api/bookings, /api/bookService ──▶ booking service
//!            ──▶ anything else                ──▶ 404 Route not found
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use service_gateway::config::load_gateway_config;
use service_gateway::observability::logging::{init_logging, LogFormat};
use service_gateway::{GatewayServer, Shutdown};

#[derive(Parser)]
#[command(name = "api-gateway", version, about = "Path-based API gateway")]
struct Cli {
    /// Optional TOML file with listener, targets, routes and timeouts.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(
        "api_gateway=info,service_gateway=info,tower_http=info",
        LogFormat::from_env(),
    );

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "api-gateway starting");

    let config = load_gateway_config(cli.config.as_deref()).inspect_err(|e| {
        tracing::error!(error = %e, "Invalid gateway configuration");
    })?;

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        upstream_timeout_secs = config.timeouts.upstream_secs,
        routes = config.routes.len(),
        "Configuration loaded"
    );

    let server = GatewayServer::new(config)?;

    let listener = TcpListener::bind(server.config().listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
