//! Health check handlers for Kubernetes probes.
//!
//! Provides `/health/live` and `/health/ready` endpoints that return JSON
//! status responses for liveness and readiness probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bikeroute_lib::SimplifyThresholds;
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator: "ok" or "not_ready: <reason>".
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// Whether a provider API key is configured (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_configured: Option<bool>,

    /// Active simplification thresholds (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<SimplifyThresholds>,
}

impl HealthStatus {
    /// Create a healthy liveness status.
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            provider_configured: None,
            thresholds: None,
        }
    }

    /// Create a ready status carrying the active configuration.
    pub fn ready(service: &str, version: &str, thresholds: SimplifyThresholds) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            provider_configured: Some(true),
            thresholds: Some(thresholds),
        }
    }

    /// Create a not-ready status.
    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            service: service.to_string(),
            version: version.to_string(),
            provider_configured: Some(false),
            thresholds: None,
        }
    }
}

/// Liveness probe handler.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"bikeroute-service-shared","version":"0.1.0"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// Ready once a provider API key is configured; the provider itself is not
/// called.
///
/// ```text
/// GET /health/ready
/// {"status":"ok",...,"provider_configured":true,"thresholds":{"min_spacing_meters":15.0,"zigzag_meters":30.0}}
/// ```
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    if !state.maps().has_api_key() {
        let status = HealthStatus::not_ready(service, version, "maps API key not configured");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    let status = HealthStatus::ready(service, version, state.thresholds());
    (StatusCode::OK, Json(status)).into_response()
}
