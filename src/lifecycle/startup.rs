//! Startup orchestration for the binaries.
//!
//! Fail fast: any startup error is fatal and happens before the listener binds.

use axum::Router;
use tokio::net::TcpListener;

use crate::config::ListenerConfig;
use crate::http::server::serve;
use crate::lifecycle::shutdown::Shutdown;

/// Bind `listener`, serve `app`, and stop on Ctrl+C or SIGTERM.
pub async fn run_until_signal(
    service: &str,
    listener: &ListenerConfig,
    app: Router,
) -> Result<(), std::io::Error> {
    let tcp = TcpListener::bind(listener.bind_address()).await?;
    tracing::info!(
        service,
        address = %tcp.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();
    serve(tcp, app, shutdown.subscribe()).await?;

    tracing::info!(service, "Shutdown complete");
    Ok(())
}
