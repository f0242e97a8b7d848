//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Provides structured error responses following the Problem Details standard.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use bikeroute_lib::Error as LibError;

/// Problem type URI for locations the provider could not resolve.
pub const PROBLEM_LOCATION_NOT_FOUND: &str = "/problems/location-not-found";

/// Problem type URI for requests the provider found no route for.
pub const PROBLEM_ROUTE_NOT_FOUND: &str = "/problems/route-not-found";

/// Problem type URI for invalid request parameters.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for unsupported HTTP methods.
pub const PROBLEM_METHOD_NOT_ALLOWED: &str = "/problems/method-not-allowed";

/// Problem type URI for maps provider and notification server failures.
pub const PROBLEM_UPSTREAM_ERROR: &str = "/problems/upstream-error";

/// RFC 9457 Problem Details response structure.
///
/// # Example
///
/// ```
/// use bikeroute_service_shared::{ProblemDetails, PROBLEM_LOCATION_NOT_FOUND};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(
///     PROBLEM_LOCATION_NOT_FOUND,
///     "Location Not Found",
///     StatusCode::NOT_FOUND,
/// )
/// .with_detail("Destination 'Nowhere, ZZ' could not be resolved")
/// .with_request_id("req-12345");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI reference identifying the specific occurrence (e.g., request ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Content type for this response (always "application/problem+json").
    pub content_type: String,
}

impl ProblemDetails {
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            content_type: "application/problem+json".to_string(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add the request identifier for tracing.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// 400 Bad Request for malformed or invalid input.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// 404 Not Found for an origin or destination the provider cannot geocode.
    pub fn location_not_found(location: &str, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_LOCATION_NOT_FOUND,
            "Location Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(format!("Location '{}' could not be resolved", location))
        .with_request_id(request_id)
    }

    /// 404 Not Found when the provider returns no route.
    pub fn route_not_found(destination: &str, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_ROUTE_NOT_FOUND,
            "Route Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(format!("No bicycling route found to '{}'", destination))
        .with_request_id(request_id)
    }

    /// 405 Method Not Allowed.
    pub fn method_not_allowed(method: &str, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_METHOD_NOT_ALLOWED,
            "Method Not Allowed",
            StatusCode::METHOD_NOT_ALLOWED,
        )
        .with_detail(format!("Method {} is not allowed; use POST", method))
        .with_request_id(request_id)
    }

    /// 502 Bad Gateway for maps provider failures.
    pub fn upstream_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_UPSTREAM_ERROR,
            "Upstream Error",
            StatusCode::BAD_GATEWAY,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.title,
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        *response.status_mut() = status;
        response
    }
}

/// Convert library errors to ProblemDetails.
///
/// The `request_id` must be provided separately since library errors don't have it.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::LocationNotFound { location } => {
            ProblemDetails::location_not_found(location, request_id)
        }
        LibError::ProviderStatus { .. }
        | LibError::ProviderHttp { .. }
        | LibError::Http(_)
        | LibError::NotificationRejected { .. } => {
            ProblemDetails::upstream_error(error.to_string(), request_id)
        }
    }
}

/// Metric label describing why a library call failed.
pub fn failure_reason(error: &LibError) -> &'static str {
    match error {
        LibError::LocationNotFound { .. } => "location_not_found",
        LibError::ProviderStatus { .. } => "provider_status",
        LibError::ProviderHttp { .. } => "provider_http",
        LibError::Http(_) => "provider_unreachable",
        LibError::NotificationRejected { .. } => "notification_rejected",
    }
}
