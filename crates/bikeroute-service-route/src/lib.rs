//! Bike route refinement HTTP microservice.
//!
//! # Endpoints
//!
//! - `POST /route` - Fetch bicycling directions and return refined routes
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe
//!
//! Any other method on `/route` answers 405 with a problem document.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, Method, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use tracing::{error, info, warn};

use bikeroute_lib::{
    Notification, RouteSet, lookup_points, refine_routes, resolve_lookups,
};
use bikeroute_service_shared::{
    AppState, MetricsConfig, MetricsLayer, ProblemDetails, RouteRequest, ServiceConfig,
    Validate, extract_or_generate_request_id, failure_reason, from_lib_error, health_live,
    health_ready, metrics_handler, record_lookup_misses, record_route_calculated,
    record_route_failed, record_route_points, startup_notifier,
};

/// Service label used for metrics.
pub const SERVICE: &str = "route";

/// Context attached to every notification from this service.
const NOTIFY_CONTEXT: &str = "Route Handler";

/// Context for failures before the server starts.
const STARTUP_CONTEXT: &str = "Main";

/// HTTP response - either success or RFC 9457 error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Response {
    Success(RouteSet),
    Error(ProblemDetails),
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        match self {
            Response::Success(routes) => (StatusCode::OK, Json(routes)).into_response(),
            Response::Error(problem) => problem.into_response(),
        }
    }
}

/// Build the service router.
pub fn app(state: AppState, metrics: &MetricsConfig) -> Router {
    let mut router = Router::new()
        .route("/route", post(route_handler).fallback(method_not_allowed))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready));

    if metrics.enabled {
        router = router.route(&metrics.path, get(metrics_handler));
    }

    router.layer(MetricsLayer).with_state(state)
}

/// Handle POST /route requests.
async fn route_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> Response {
    let request_id = extract_or_generate_request_id(&headers).to_string();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let detail = rejection.body_text();
            warn!(request_id = %request_id, error = %detail, "invalid route request body");
            record_route_failed("invalid_json", SERVICE);
            notify(&state, Notification::error(&detail, "Route Handler - JSON Decode"));
            return Response::Error(ProblemDetails::bad_request(detail, &request_id));
        }
    };

    info!(
        request_id = %request_id,
        lat = request.origin.lat,
        lng = request.origin.lng,
        destination = %request.destination,
        alternatives = request.alternatives,
        "handling route request"
    );

    if let Err(problem) = request.validate(&request_id) {
        record_route_failed("validation_error", SERVICE);
        return Response::Error(*problem);
    }

    let raws = match state.maps().directions(&request.directions_query()).await {
        Ok(raws) => raws,
        Err(e) => {
            error!(request_id = %request_id, error = %e, "directions request failed");
            record_route_failed(failure_reason(&e), SERVICE);
            notify(&state, Notification::error(&e, NOTIFY_CONTEXT));
            return Response::Error(from_lib_error(&e, &request_id));
        }
    };

    if raws.is_empty() {
        info!(request_id = %request_id, "provider returned no routes");
        record_route_failed("no_route", SERVICE);
        return Response::Error(ProblemDetails::route_not_found(
            request.destination.trim(),
            &request_id,
        ));
    }

    let points = lookup_points(raws.iter().flat_map(|raw| &raw.legs));
    let lookups = resolve_lookups(state.maps(), &points, state.lookup_concurrency()).await;
    record_lookup_misses("elevation", points.len() - lookups.elevation_count());
    record_lookup_misses("label", points.len() - lookups.label_count());

    let thresholds = request.thresholds(state.thresholds());
    let route_set = refine_routes(&raws, &lookups, &thresholds);

    for route in &route_set.routes {
        // The aggregator emits one raw waypoint per instruction.
        record_route_points(route.instructions.len(), route.points.len());
    }
    record_route_calculated(request.alternatives, SERVICE);

    info!(
        request_id = %request_id,
        routes = route_set.routes.len(),
        lookup_points = points.len(),
        "route request processed"
    );
    notify(
        &state,
        Notification::info(
            format!(
                "Route request processed: Origin={},{}, Destination={}, RoutesFound={}",
                request.origin.lat,
                request.origin.lng,
                request.destination.trim(),
                route_set.routes.len()
            ),
            NOTIFY_CONTEXT,
        ),
    );

    Response::Success(route_set)
}

/// Fallback for every non-POST method on /route.
async fn method_not_allowed(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> axum::response::Response {
    let request_id = extract_or_generate_request_id(&headers).to_string();

    warn!(request_id = %request_id, method = %method, "method not allowed");
    record_route_failed("method_not_allowed", SERVICE);
    notify(
        &state,
        Notification::error(format!("Invalid request method: {}", method), NOTIFY_CONTEXT),
    );

    (
        [(header::ALLOW, "POST")],
        ProblemDetails::method_not_allowed(method.as_str(), &request_id),
    )
        .into_response()
}

/// Deliver a notification in the background; failures are only logged.
fn notify(state: &AppState, notification: Notification) {
    let notifier = state.notifier().clone();
    if notifier.topic_for(notification.kind).is_none() {
        return;
    }

    tokio::spawn(async move {
        if let Err(e) = notifier.send(&notification).await {
            warn!(error = %e, "notification delivery failed");
        }
    });
}

/// Send a startup failure to the error topic and wait for delivery.
pub async fn report_startup_failure(config: &ServiceConfig, failure: impl std::fmt::Display) {
    let notifier = match startup_notifier(config) {
        Ok(notifier) => notifier,
        Err(e) => {
            warn!(error = %e, "cannot build notifier for startup failure");
            return;
        }
    };

    if let Err(e) = notifier
        .send(&Notification::error(failure, STARTUP_CONTEXT))
        .await
    {
        warn!(error = %e, "startup failure notification not delivered");
    }
}
