//! Shared infrastructure for the bike route HTTP services.
//!
//! This crate provides the HTTP glue around `bikeroute-lib`:
//!
//! - [`ServiceConfig`]: Environment-driven configuration
//! - [`AppState`]: Provider client, notifier and refinement thresholds
//! - [`health`]: Liveness/readiness probe handlers
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent error responses
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request tracking and metrics middleware
//! - [`RouteRequest`] with validation
//!
//! # Architecture
//!
//! Handlers stay thin; refinement logic lives in `bikeroute-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse request JSON                                       │
//! │  - Validate parameters                                      │
//! │  - Fetch directions and lookups through MapsClient          │
//! │  - Refine with bikeroute-lib                                │
//! │  - Format response                                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module builds state pointed at a fake provider. Enable
//! the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

mod config;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ConfigError, ServiceConfig};
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_lookup_misses, record_route_calculated,
    record_route_failed, record_route_points, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId, REQUEST_ID_HEADER};
pub use problem::{
    failure_reason, from_lib_error, ProblemDetails, PROBLEM_INVALID_REQUEST,
    PROBLEM_LOCATION_NOT_FOUND, PROBLEM_METHOD_NOT_ALLOWED, PROBLEM_ROUTE_NOT_FOUND,
    PROBLEM_UPSTREAM_ERROR,
};
pub use request::{RouteRequest, Validate};
pub use state::{startup_notifier, AppState, AppStateError};
