//! Single-process backend serving both the auth and booking APIs.

use service_gateway::auth::AuthService;
use service_gateway::booking::BookingService;
use service_gateway::config::{load_service_config, validation::parse_database_uri, ServiceConfig};
use service_gateway::lifecycle::run_until_signal;
use service_gateway::monolith::{self, MONOLITH_SERVICE_ID};
use service_gateway::observability::logging::{init_logging, LogFormat};
use service_gateway::observability::metrics::Metrics;
use service_gateway::store;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(
        "vehicle_backend=info,service_gateway=info,tower_http=info",
        LogFormat::from_env(),
    );

    let config = load_service_config(ServiceConfig::monolith()).inspect_err(|e| {
        tracing::error!(error = %e, "Invalid backend configuration");
    })?;
    let database = parse_database_uri(&config.database_uri)?;
    let repos = store::open(&database).await.inspect_err(|e| {
        tracing::error!(error = %e, "Failed to open persistence service");
    })?;
    tracing::info!(
        backend = repos.backend,
        host = database.host_str().unwrap_or("-"),
        database = database.path().trim_start_matches('/'),
        "Connected to persistence service"
    );

    let auth = AuthService::new(repos.users);
    if config.seed_admin {
        auth.seed_admin().await?;
    }
    let bookings = BookingService::new(repos.bookings);

    let app = monolith::app(auth, bookings, Metrics::new(MONOLITH_SERVICE_ID));
    run_until_signal(MONOLITH_SERVICE_ID, &config.listener, app).await?;
    Ok(())
}
