//! Application state for HTTP microservices.
//!
//! Holds the maps provider client, the notifier and the refinement settings
//! that every handler needs.

use std::sync::Arc;

use bikeroute_lib::{MapsClient, Notifier, SimplifyThresholds};

use crate::config::{ServiceConfig, DEFAULT_LOOKUP_CONCURRENCY};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// The shared HTTP client could not be built.
    HttpClient(reqwest::Error),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpClient(e) => write!(f, "failed to build HTTP client: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(e) => Some(e),
        }
    }
}

impl From<reqwest::Error> for AppStateError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpClient(err)
    }
}

/// Notifier for failures that happen before [`AppState`] exists.
///
/// Builds its own HTTP client so it does not depend on the one that failed.
pub fn startup_notifier(config: &ServiceConfig) -> Result<Notifier, AppStateError> {
    let http = reqwest::Client::builder()
        .timeout(config.provider_timeout)
        .build()?;

    Ok(Notifier::new(http, config.notify_base_url.clone())
        .with_error_topic(config.notify_error_topic.clone())
        .with_info_topic(config.notify_info_topic.clone()))
}

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable (`Arc` inside); share it via axum's `State` extractor.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::post, extract::State};
/// use bikeroute_service_shared::{AppState, ServiceConfig};
///
/// async fn handler(State(state): State<AppState>) {
///     let client = state.maps();
///     // ... call the provider
/// }
///
/// let state = AppState::from_config(&ServiceConfig::from_env()?)?;
/// let app = Router::new()
///     .route("/route", post(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    maps: MapsClient,
    notifier: Notifier,
    thresholds: SimplifyThresholds,
    lookup_concurrency: usize,
}

impl AppState {
    /// Build state from configuration.
    ///
    /// One `reqwest` client (with the provider timeout) is shared by the maps
    /// client and the notifier.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, AppStateError> {
        let http = reqwest::Client::builder()
            .timeout(config.provider_timeout)
            .build()?;

        let maps = MapsClient::with_http_client(
            http.clone(),
            config.api_key.clone(),
            config.maps_base_url.clone(),
        );
        let notifier = Notifier::new(http, config.notify_base_url.clone())
            .with_error_topic(config.notify_error_topic.clone())
            .with_info_topic(config.notify_info_topic.clone());

        tracing::info!(
            maps_base_url = %maps.base_url(),
            notifications = notifier.is_enabled(),
            lookup_concurrency = config.lookup_concurrency,
            min_spacing_meters = config.thresholds.min_spacing_meters,
            zigzag_meters = config.thresholds.zigzag_meters,
            "application state built"
        );

        Ok(Self::from_components(
            maps,
            notifier,
            config.thresholds,
            config.lookup_concurrency,
        ))
    }

    /// Create application state from pre-built components.
    ///
    /// A `lookup_concurrency` of zero is replaced by the default.
    pub fn from_components(
        maps: MapsClient,
        notifier: Notifier,
        thresholds: SimplifyThresholds,
        lookup_concurrency: usize,
    ) -> Self {
        let lookup_concurrency = if lookup_concurrency == 0 {
            DEFAULT_LOOKUP_CONCURRENCY
        } else {
            lookup_concurrency
        };

        Self {
            inner: Arc::new(AppStateInner {
                maps,
                notifier,
                thresholds,
                lookup_concurrency,
            }),
        }
    }

    pub fn maps(&self) -> &MapsClient {
        &self.inner.maps
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    /// Deployment-wide simplification thresholds.
    pub fn thresholds(&self) -> SimplifyThresholds {
        self.inner.thresholds
    }

    /// Maximum coordinates resolved concurrently per request.
    pub fn lookup_concurrency(&self) -> usize {
        self.inner.lookup_concurrency
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("maps", &self.inner.maps)
            .field("notifications", &self.inner.notifier.is_enabled())
            .field("thresholds", &self.inner.thresholds)
            .field("lookup_concurrency", &self.inner.lookup_concurrency)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bikeroute_lib::NotificationKind;
    use std::time::Duration;

    fn config() -> ServiceConfig {
        ServiceConfig {
            api_key: "secret-key".to_string(),
            maps_base_url: "http://localhost:9000/".to_string(),
            provider_timeout: Duration::from_secs(2),
            lookup_concurrency: 4,
            thresholds: SimplifyThresholds::new(20.0, 40.0),
            notify_base_url: "http://localhost:9001".to_string(),
            notify_error_topic: Some("errors".to_string()),
            notify_info_topic: None,
            port: 8080,
        }
    }

    #[test]
    fn test_app_state_from_config() {
        let state = AppState::from_config(&config()).unwrap();

        assert_eq!(state.maps().base_url(), "http://localhost:9000");
        assert!(state.maps().has_api_key());
        assert!(state.notifier().is_enabled());
        assert_eq!(state.thresholds(), SimplifyThresholds::new(20.0, 40.0));
        assert_eq!(state.lookup_concurrency(), 4);
    }

    #[test]
    fn test_startup_notifier_uses_configured_topics() {
        let notifier = startup_notifier(&config()).unwrap();

        assert_eq!(notifier.topic_for(NotificationKind::Error), Some("errors"));
        assert_eq!(notifier.topic_for(NotificationKind::Info), None);
    }

    #[test]
    fn test_zero_concurrency_uses_default() {
        let state = AppState::from_components(
            MapsClient::with_http_client(reqwest::Client::new(), "k", "http://localhost"),
            Notifier::disabled(),
            SimplifyThresholds::new(15.0, 30.0),
            0,
        );
        assert_eq!(state.lookup_concurrency(), DEFAULT_LOOKUP_CONCURRENCY);
    }

    #[test]
    fn test_app_state_debug_hides_api_key() {
        let state = AppState::from_config(&config()).unwrap();
        let debug = format!("{:?}", state);

        assert!(debug.contains("AppState"));
        assert!(debug.contains("lookup_concurrency"));
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn test_app_state_clone_shares_inner() {
        let state1 = AppState::from_config(&config()).unwrap();
        let state2 = state1.clone();
        assert!(Arc::ptr_eq(&state1.inner, &state2.inner));
    }
}
