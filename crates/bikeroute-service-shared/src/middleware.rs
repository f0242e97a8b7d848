//! HTTP middleware for the bike route services.
//!
//! - [`RequestId`]: Newtype for correlation ID extraction/generation
//! - [`extract_or_generate_request_id`]: Extract `X-Request-ID` or generate UUID v7
//! - [`MetricsLayer`]: Tower middleware for request tracking and HTTP metrics
//!
//! # Request ID Propagation
//!
//! `MetricsLayer` resolves the request ID once: an incoming `X-Request-ID`
//! is kept, otherwise a UUID v7 is generated and written back onto the
//! request headers, so handlers calling [`extract_or_generate_request_id`]
//! see the same ID. The ID is echoed on the response and recorded on the
//! `request` tracing span.
//!
//! # Metrics Recording
//!
//! - `http_requests_total`: Counter by method, path, status bucket
//! - `http_request_duration_seconds`: Histogram by method, path
//! - `http_request_size_bytes`: Histogram by method, path
//! - `http_response_size_bytes`: Histogram by method, path

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::http::{HeaderMap, HeaderValue, Request, Response};
use pin_project_lite::pin_project;
use tower::{Layer, Service};
use tracing::{info_span, Span};
use uuid::Uuid;

/// Header carrying the request correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Newtype wrapper for request correlation IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new UUID v7 request ID.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the request ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Extract the request ID from headers or generate a new UUID v7.
///
/// An absent, empty or non-UTF-8 `X-Request-ID` header yields a fresh ID.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(RequestId::from)
        .unwrap_or_else(RequestId::generate)
}

/// Strip the query string so metric labels stay low-cardinality.
pub fn normalize_path(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}

/// Convert HTTP status code to bucket label.
///
/// Groups status codes into buckets: "2xx", "3xx", "4xx", "5xx".
fn status_bucket(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

// =============================================================================
// MetricsLayer - Tower middleware for HTTP metrics
// =============================================================================

/// Tower layer for request IDs, request spans and HTTP metrics.
#[derive(Debug, Clone)]
pub struct MetricsLayer;

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsMiddleware { inner }
    }
}

/// Middleware service that records HTTP metrics.
#[derive(Debug, Clone)]
pub struct MetricsMiddleware<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for MetricsMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: http_body::Body + Send + 'static,
    ResBody: http_body::Body + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = MetricsFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let start = Instant::now();

        // Extract request metadata for metrics
        let method = req.method().to_string();
        let path = normalize_path(req.uri().path()).to_string();

        // Record request size
        if let Some(content_length) = req.headers().get(http::header::CONTENT_LENGTH) {
            if let Ok(size) = content_length.to_str().unwrap_or("0").parse::<f64>() {
                metrics::histogram!(
                    "http_request_size_bytes",
                    "method" => method.clone(),
                    "path" => path.clone()
                )
                .record(size);
            }
        }

        let request_id = extract_or_generate_request_id(req.headers());
        let header_value = HeaderValue::from_str(request_id.as_str()).ok();
        if let Some(value) = &header_value {
            req.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
        }
        let remote_addr = req
            .extensions()
            .get::<std::net::SocketAddr>()
            .map(|a| a.to_string());

        // Create request span with correlation ID
        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %method,
            path = %path,
            remote_addr = remote_addr.as_deref().unwrap_or("-"),
        );

        {
            let _enter = span.enter();
            tracing::info!("handling request");
        }

        let future = self.inner.call(req);

        MetricsFuture {
            inner: future,
            start,
            method,
            path,
            header_value,
            span,
        }
    }
}

pin_project! {
    /// Future wrapper that records metrics on completion.
    pub struct MetricsFuture<F> {
        #[pin]
        inner: F,
        start: Instant,
        method: String,
        path: String,
        header_value: Option<HeaderValue>,
        span: Span,
    }
}

impl<F, ResBody, E> Future for MetricsFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
    ResBody: http_body::Body,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let _enter = this.span.enter();

        match this.inner.poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(mut result) => {
                let duration = this.start.elapsed();
                let duration_secs = duration.as_secs_f64();
                let latency_ms = duration.as_secs_f64() * 1000.0;

                match &mut result {
                    Ok(response) => {
                        if let Some(value) = this.header_value.take() {
                            response.headers_mut().insert(REQUEST_ID_HEADER, value);
                        }
                        let status = response.status().as_u16();
                        let status_label = status_bucket(status);

                        // Record request counter
                        metrics::counter!(
                            "http_requests_total",
                            "method" => this.method.clone(),
                            "path" => this.path.clone(),
                            "status" => status_label
                        )
                        .increment(1);

                        // Record duration histogram
                        metrics::histogram!(
                            "http_request_duration_seconds",
                            "method" => this.method.clone(),
                            "path" => this.path.clone()
                        )
                        .record(duration_secs);

                        // Record response size if available
                        if let Some(content_length) = response.headers().get(http::header::CONTENT_LENGTH) {
                            if let Ok(size) = content_length.to_str().unwrap_or("0").parse::<f64>() {
                                metrics::histogram!(
                                    "http_response_size_bytes",
                                    "method" => this.method.clone(),
                                    "path" => this.path.clone()
                                )
                                .record(size);
                            }
                        }

                        tracing::info!(
                            status = status,
                            latency_ms = latency_ms,
                            "request completed"
                        );
                    }
                    Err(_) => {
                        // Record as 5xx for errors
                        metrics::counter!(
                            "http_requests_total",
                            "method" => this.method.clone(),
                            "path" => this.path.clone(),
                            "status" => "5xx"
                        )
                        .increment(1);

                        metrics::histogram!(
                            "http_request_duration_seconds",
                            "method" => this.method.clone(),
                            "path" => this.path.clone()
                        )
                        .record(duration_secs);

                        tracing::error!(
                            latency_ms = latency_ms,
                            "request failed"
                        );
                    }
                }

                Poll::Ready(result)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    use axum::body::Body;
    use tower::{service_fn, ServiceExt};

    #[test]
    fn test_request_id_generate() {
        let id1 = RequestId::generate();
        let id2 = RequestId::generate();

        assert_ne!(id1, id2);
        assert_eq!(id1.as_str().len(), 36);
    }

    #[test]
    fn test_extract_request_id_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Request-ID", HeaderValue::from_static("test-123"));

        assert_eq!(extract_or_generate_request_id(&headers).as_str(), "test-123");
    }

    #[test]
    fn test_extract_request_id_generates_when_missing_or_empty() {
        assert_eq!(extract_or_generate_request_id(&HeaderMap::new()).as_str().len(), 36);

        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(""));
        assert_eq!(extract_or_generate_request_id(&headers).as_str().len(), 36);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/route"), "/route");
        assert_eq!(normalize_path("/route?debug=1"), "/route");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_status_bucket() {
        assert_eq!(status_bucket(200), "2xx");
        assert_eq!(status_bucket(301), "3xx");
        assert_eq!(status_bucket(405), "4xx");
        assert_eq!(status_bucket(502), "5xx");
        assert_eq!(status_bucket(99), "other");
    }

    #[tokio::test]
    async fn test_layer_shares_generated_id_with_handler_and_response() {
        let service = MetricsLayer.layer(service_fn(|req: Request<Body>| async move {
            let seen = extract_or_generate_request_id(req.headers());
            let mut response = Response::new(Body::empty());
            response.headers_mut().insert(
                "x-seen-id",
                HeaderValue::from_str(seen.as_str()).unwrap(),
            );
            Ok::<_, Infallible>(response)
        }));

        let response = service
            .oneshot(Request::builder().uri("/route").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let echoed = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert_eq!(echoed, response.headers().get("x-seen-id").unwrap());
    }

    #[tokio::test]
    async fn test_layer_keeps_incoming_id() {
        let service = MetricsLayer.layer(service_fn(|_req: Request<Body>| async move {
            Ok::<_, Infallible>(Response::new(Body::empty()))
        }));

        let request = Request::builder()
            .uri("/route")
            .header(REQUEST_ID_HEADER, "client-42")
            .body(Body::empty())
            .unwrap();
        let response = service.oneshot(request).await.unwrap();

        assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "client-42");
    }
}
