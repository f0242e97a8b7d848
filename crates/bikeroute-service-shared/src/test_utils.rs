//! Test utilities for handler testing.
//!
//! State built here points the maps client at a fake provider (usually a
//! `wiremock` server) and keeps notifications switched off unless a test
//! opts in.

use std::time::Duration;

use bikeroute_lib::{MapsClient, Notifier, SimplifyThresholds};

use crate::state::AppState;

/// API key sent by test clients.
pub const TEST_API_KEY: &str = "test-api-key";

/// Thresholds used by [`test_state`].
pub fn test_thresholds() -> SimplifyThresholds {
    SimplifyThresholds::new(15.0, 30.0)
}

fn test_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("test HTTP client builds")
}

/// State whose provider lives at `maps_base_url`, with notifications off.
pub fn test_state(maps_base_url: &str) -> AppState {
    test_state_with_notifier(maps_base_url, Notifier::disabled())
}

/// State whose provider lives at `maps_base_url`, notifying through `notifier`.
pub fn test_state_with_notifier(maps_base_url: &str, notifier: Notifier) -> AppState {
    let maps = MapsClient::with_http_client(test_http_client(), TEST_API_KEY, maps_base_url);
    AppState::from_components(maps, notifier, test_thresholds(), 4)
}

/// Notifier posting both kinds to `base_url` under fixed test topics.
pub fn test_notifier(base_url: &str) -> Notifier {
    Notifier::new(test_http_client(), base_url)
        .with_error_topic(Some(fixture_topics::ERRORS.to_string()))
        .with_info_topic(Some(fixture_topics::INFO.to_string()))
}

/// Topics used by [`test_notifier`].
pub mod fixture_topics {
    pub const ERRORS: &str = "bikeroute-test-errors";
    pub const INFO: &str = "bikeroute-test-info";
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    format!("test-{}", uuid::Uuid::now_v7())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_uses_given_provider() {
        let state = test_state("http://127.0.0.1:9/");
        assert_eq!(state.maps().base_url(), "http://127.0.0.1:9");
        assert!(state.maps().has_api_key());
        assert!(!state.notifier().is_enabled());
        assert_eq!(state.thresholds(), test_thresholds());
    }

    #[test]
    fn test_notifier_has_both_topics() {
        let notifier = test_notifier("http://127.0.0.1:9");
        assert!(notifier.is_enabled());
        assert_eq!(
            notifier.topic_for(bikeroute_lib::NotificationKind::Info),
            Some(fixture_topics::INFO)
        );
    }

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(test_request_id(), test_request_id());
    }
}
