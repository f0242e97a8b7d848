//! Bike route refinement HTTP microservice.
//!
//! # Configuration
//!
//! Variables are read from the process environment, after loading a `.env`
//! file from the working directory if one exists.
//!
//! - `GOOGLE_MAPS_API_KEY` - Maps provider credential (required)
//! - `MAPS_API_BASE_URL`, `PROVIDER_TIMEOUT_SECS`, `LOOKUP_CONCURRENCY`
//! - `ROUTE_MIN_SPACING_METERS`, `ROUTE_ZIGZAG_METERS` - simplification thresholds
//! - `NOTIFY_BASE_URL`, `NOTIFY_ERROR_TOPIC`, `NOTIFY_INFO_TOPIC` - push notifications
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `SERVICE_PORT` - HTTP port (default: 8080)

use std::net::SocketAddr;

use tracing::{error, info, warn};

use bikeroute_service_route::{app, report_startup_failure};
use bikeroute_service_shared::{
    AppState, LoggingConfig, MetricsConfig, ServiceConfig, init_logging, init_metrics,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before anything reads the environment.
    let dotenv = dotenvy::dotenv();

    let logging_config = LoggingConfig::from_env().with_service("route");
    init_logging(&logging_config);

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "failed to read environment file"),
    }

    let metrics_config = MetricsConfig::from_env();
    if metrics_config.enabled {
        if let Err(e) = init_metrics(&metrics_config) {
            warn!(error = %e, "failed to initialize metrics, continuing without metrics");
        }
    }

    let config = ServiceConfig::from_env().map_err(|e| {
        error!(error = %e, "invalid configuration");
        e
    })?;

    info!(
        port = config.port,
        maps_base_url = %config.maps_base_url,
        "starting route service"
    );

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            report_startup_failure(&config, &e).await;
            return Err(e.into());
        }
    };

    let router = app(state, &metrics_config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
