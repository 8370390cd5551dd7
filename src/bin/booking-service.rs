//! Booking service: validated creation and listing of service bookings.

use service_gateway::booking::{self, BookingService, BOOKING_SERVICE_ID};
use service_gateway::config::{load_service_config, validation::parse_database_uri, ServiceConfig};
use service_gateway::lifecycle::run_until_signal;
use service_gateway::observability::logging::{init_logging, LogFormat};
use service_gateway::observability::metrics::Metrics;
use service_gateway::store;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(
        "booking_service=info,service_gateway=info,tower_http=info",
        LogFormat::from_env(),
    );

    let config = load_service_config(ServiceConfig::booking()).inspect_err(|e| {
        tracing::error!(error = %e, "Invalid booking service configuration");
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

    let bookings = BookingService::new(repos.bookings);

    let app = booking::app(bookings, Metrics::new(BOOKING_SERVICE_ID));
    run_until_signal(BOOKING_SERVICE_ID, &config.listener, app).await?;
    Ok(())
}
