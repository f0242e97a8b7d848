//! Service configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `GOOGLE_MAPS_API_KEY` | required |
//! | `MAPS_API_BASE_URL` | `https://maps.googleapis.com` |
//! | `PROVIDER_TIMEOUT_SECS` | `10` |
//! | `LOOKUP_CONCURRENCY` | `8` |
//! | `ROUTE_MIN_SPACING_METERS` | `15` |
//! | `ROUTE_ZIGZAG_METERS` | `30` |
//! | `NOTIFY_BASE_URL` | `https://ntfy.sh` |
//! | `NOTIFY_ERROR_TOPIC` | unset (error notifications off) |
//! | `NOTIFY_INFO_TOPIC` | unset (info notifications off) |
//! | `SERVICE_PORT` | `8080` |

use std::str::FromStr;
use std::time::Duration;

use bikeroute_lib::notify::DEFAULT_NOTIFY_URL;
use bikeroute_lib::provider::DEFAULT_BASE_URL;
use bikeroute_lib::SimplifyThresholds;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOOKUP_CONCURRENCY: usize = 8;
pub const DEFAULT_MIN_SPACING_METERS: f64 = 15.0;
pub const DEFAULT_ZIGZAG_METERS: f64 = 30.0;

/// Error raised while reading configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    Invalid { name: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "{} must be set", name),
            Self::Invalid { name, value } => write!(f, "invalid value for {}: '{}'", name, value),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Runtime configuration of the route service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub api_key: String,
    pub maps_base_url: String,
    pub provider_timeout: Duration,
    pub lookup_concurrency: usize,
    pub thresholds: SimplifyThresholds,
    pub notify_base_url: String,
    pub notify_error_topic: Option<String>,
    pub notify_info_topic: Option<String>,
    pub port: u16,
}

impl ServiceConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key =
            var("GOOGLE_MAPS_API_KEY").ok_or(ConfigError::Missing("GOOGLE_MAPS_API_KEY"))?;

        let timeout_secs: u64 = parse_or(&var, "PROVIDER_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let lookup_concurrency: usize =
            parse_or(&var, "LOOKUP_CONCURRENCY", DEFAULT_LOOKUP_CONCURRENCY)?;
        let min_spacing: f64 =
            parse_or(&var, "ROUTE_MIN_SPACING_METERS", DEFAULT_MIN_SPACING_METERS)?;
        let zigzag: f64 = parse_or(&var, "ROUTE_ZIGZAG_METERS", DEFAULT_ZIGZAG_METERS)?;
        let port: u16 = parse_or(&var, "SERVICE_PORT", DEFAULT_PORT)?;

        if lookup_concurrency == 0 {
            return Err(invalid(&var, "LOOKUP_CONCURRENCY"));
        }
        if !(min_spacing.is_finite() && min_spacing > 0.0) {
            return Err(invalid(&var, "ROUTE_MIN_SPACING_METERS"));
        }
        if !(zigzag.is_finite() && zigzag > 0.0) {
            return Err(invalid(&var, "ROUTE_ZIGZAG_METERS"));
        }

        Ok(Self {
            api_key,
            maps_base_url: var("MAPS_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            provider_timeout: Duration::from_secs(timeout_secs),
            lookup_concurrency,
            thresholds: SimplifyThresholds::new(min_spacing, zigzag),
            notify_base_url: var("NOTIFY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_NOTIFY_URL.to_string()),
            notify_error_topic: var("NOTIFY_ERROR_TOPIC"),
            notify_info_topic: var("NOTIFY_INFO_TOPIC"),
            port,
        })
    }
}

fn parse_or<T, V>(var: &V, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    V: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}

fn invalid<V>(var: &V, name: &'static str) -> ConfigError
where
    V: Fn(&str) -> Option<String>,
{
    ConfigError::Invalid {
        name,
        value: var(name).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServiceConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_apply_with_only_api_key() {
        let config = config_from(&[("GOOGLE_MAPS_API_KEY", "abc")]).unwrap();

        assert_eq!(config.api_key, "abc");
        assert_eq!(config.maps_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.provider_timeout, Duration::from_secs(10));
        assert_eq!(config.lookup_concurrency, 8);
        assert_eq!(config.thresholds, SimplifyThresholds::new(15.0, 30.0));
        assert_eq!(config.notify_base_url, DEFAULT_NOTIFY_URL);
        assert!(config.notify_error_topic.is_none());
        assert!(config.notify_info_topic.is_none());
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_missing_or_blank_api_key_is_rejected() {
        assert_eq!(
            config_from(&[]).unwrap_err(),
            ConfigError::Missing("GOOGLE_MAPS_API_KEY")
        );
        assert_eq!(
            config_from(&[("GOOGLE_MAPS_API_KEY", "   ")]).unwrap_err(),
            ConfigError::Missing("GOOGLE_MAPS_API_KEY")
        );
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = config_from(&[
            ("GOOGLE_MAPS_API_KEY", "abc"),
            ("MAPS_API_BASE_URL", "http://localhost:9000"),
            ("PROVIDER_TIMEOUT_SECS", "3"),
            ("LOOKUP_CONCURRENCY", "2"),
            ("ROUTE_MIN_SPACING_METERS", "50"),
            ("ROUTE_ZIGZAG_METERS", "12.5"),
            ("NOTIFY_ERROR_TOPIC", "bike-errors"),
            ("SERVICE_PORT", "9090"),
        ])
        .unwrap();

        assert_eq!(config.maps_base_url, "http://localhost:9000");
        assert_eq!(config.provider_timeout, Duration::from_secs(3));
        assert_eq!(config.lookup_concurrency, 2);
        assert_eq!(config.thresholds, SimplifyThresholds::new(50.0, 12.5));
        assert_eq!(config.notify_error_topic.as_deref(), Some("bike-errors"));
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_unparseable_values_are_rejected() {
        let err = config_from(&[("GOOGLE_MAPS_API_KEY", "abc"), ("SERVICE_PORT", "http")])
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "SERVICE_PORT",
                value: "http".to_string()
            }
        );
        assert!(err.to_string().contains("SERVICE_PORT"));
    }

    #[test]
    fn test_non_positive_thresholds_are_rejected() {
        let err = config_from(&[
            ("GOOGLE_MAPS_API_KEY", "abc"),
            ("ROUTE_ZIGZAG_METERS", "0"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "ROUTE_ZIGZAG_METERS", .. }));

        let err = config_from(&[("GOOGLE_MAPS_API_KEY", "abc"), ("LOOKUP_CONCURRENCY", "0")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "LOOKUP_CONCURRENCY", .. }));
    }
}
