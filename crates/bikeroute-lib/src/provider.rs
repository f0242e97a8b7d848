//! Google Maps web-service client.
//!
//! Wraps the three provider endpoints the service relies on:
//!
//! - Directions (`/maps/api/directions/json`, bicycling mode) producing
//!   [`RawRoute`]s for the refinement pipeline
//! - Elevation (`/maps/api/elevation/json`)
//! - Reverse geocoding (`/maps/api/geocode/json`)
//!
//! [`resolve_lookups`] fans the per-coordinate elevation and label requests
//! out with a bounded concurrency limit and degrades each failure to a
//! missing entry, so a flaky provider never aborts a route request.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::lookup::ResolvedLookups;
use crate::model::{Coordinate, Leg, RawRoute, Step};

/// Public Google Maps web-service host.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

const DIRECTIONS_PATH: &str = "/maps/api/directions/json";
const ELEVATION_PATH: &str = "/maps/api/elevation/json";
const GEOCODE_PATH: &str = "/maps/api/geocode/json";

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";
const STATUS_NOT_FOUND: &str = "NOT_FOUND";

/// Address component type carrying the street name.
const ROUTE_COMPONENT: &str = "route";

/// Parameters of a directions request.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsQuery {
    pub origin: Coordinate,
    /// Free-text destination, geocoded by the provider.
    pub destination: String,
    /// Ask the provider for alternative routes.
    pub alternatives: bool,
}

impl DirectionsQuery {
    pub fn new(origin: Coordinate, destination: impl Into<String>) -> Self {
        Self {
            origin,
            destination: destination.into(),
            alternatives: false,
        }
    }

    pub fn with_alternatives(mut self, alternatives: bool) -> Self {
        self.alternatives = alternatives;
        self
    }
}

/// Format a coordinate the way the provider expects (`lat,lng`, 6 decimals).
pub fn format_latlng(at: Coordinate) -> String {
    format!("{:.6},{:.6}", at.lat, at.lng)
}

/// HTTP client for the maps provider.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct MapsClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for MapsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl MapsClient {
    /// Create a client against `base_url` with a per-request timeout.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(http, api_key, base_url))
    }

    /// Create a client reusing an existing `reqwest` client.
    pub fn with_http_client(
        http: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Whether a non-blank API key is configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch bicycling directions.
    ///
    /// `ZERO_RESULTS` yields an empty list; `NOT_FOUND` (an endpoint the
    /// provider could not geocode) is reported as [`Error::LocationNotFound`].
    pub async fn directions(&self, query: &DirectionsQuery) -> Result<Vec<RawRoute>> {
        let origin = format_latlng(query.origin);
        let alternatives = if query.alternatives { "true" } else { "false" };
        let response: DirectionsResponse = self
            .get_json(
                DIRECTIONS_PATH,
                &[
                    ("origin", origin.as_str()),
                    ("destination", query.destination.as_str()),
                    ("mode", "bicycling"),
                    ("alternatives", alternatives),
                ],
            )
            .await?;

        match response.status.as_str() {
            STATUS_OK => {}
            STATUS_ZERO_RESULTS => return Ok(Vec::new()),
            STATUS_NOT_FOUND => {
                return Err(Error::LocationNotFound {
                    location: query.destination.clone(),
                })
            }
            _ => {
                return Err(Error::ProviderStatus {
                    status: response.status.clone(),
                    message: response.error_message,
                })
            }
        }

        let routes: Vec<RawRoute> = response
            .routes
            .into_iter()
            .map(ProviderRoute::into_raw)
            .collect();
        debug!(
            origin = %origin,
            destination = %query.destination,
            routes = routes.len(),
            "directions received"
        );
        Ok(routes)
    }

    /// Elevation in meters at `at`, `None` when the provider has no sample.
    pub async fn elevation(&self, at: Coordinate) -> Result<Option<f64>> {
        let locations = format_latlng(at);
        let response: ElevationResponse = self
            .get_json(ELEVATION_PATH, &[("locations", locations.as_str())])
            .await?;

        match response.status.as_str() {
            STATUS_OK => Ok(response.results.first().map(|r| r.elevation)),
            STATUS_ZERO_RESULTS => Ok(None),
            _ => Err(Error::ProviderStatus {
                status: response.status.clone(),
                message: response.error_message,
            }),
        }
    }

    /// Street name at `at`, falling back to the formatted address.
    pub async fn reverse_geocode(&self, at: Coordinate) -> Result<Option<String>> {
        let latlng = format_latlng(at);
        let response: GeocodeResponse = self
            .get_json(GEOCODE_PATH, &[("latlng", latlng.as_str())])
            .await?;

        match response.status.as_str() {
            STATUS_OK => Ok(response.results.first().map(GeocodeResult::label)),
            STATUS_ZERO_RESULTS => Ok(None),
            _ => Err(Error::ProviderStatus {
                status: response.status.clone(),
                message: response.error_message,
            }),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ProviderHttp {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

/// Resolve elevation and label for every coordinate with at most `limit`
/// coordinates in flight.
///
/// Failures are logged and leave the entry missing, which the aggregator
/// treats as elevation 0 and an empty label.
pub async fn resolve_lookups(
    client: &MapsClient,
    points: &[Coordinate],
    limit: usize,
) -> ResolvedLookups {
    let results: Vec<_> = stream::iter(points.iter().copied())
        .map(|at| async move {
            let (elevation, label) =
                futures::join!(client.elevation(at), client.reverse_geocode(at));
            (at, elevation, label)
        })
        .buffer_unordered(limit.max(1))
        .collect()
        .await;

    let mut lookups = ResolvedLookups::new();
    for (at, elevation, label) in results {
        match elevation {
            Ok(Some(meters)) => lookups.insert_elevation(at, meters),
            Ok(None) => {}
            Err(e) => warn!(lat = at.lat, lng = at.lng, error = %e, "elevation lookup failed"),
        }
        match label {
            Ok(Some(text)) => lookups.insert_label(at, text),
            Ok(None) => {}
            Err(e) => warn!(lat = at.lat, lng = at.lng, error = %e, "reverse geocode failed"),
        }
    }
    lookups
}

// =============================================================================
// Provider wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<ProviderRoute>,
}

#[derive(Debug, Deserialize)]
struct ProviderRoute {
    #[serde(default)]
    legs: Vec<ProviderLeg>,
}

#[derive(Debug, Deserialize)]
struct ProviderLeg {
    end_location: Coordinate,
    #[serde(default)]
    steps: Vec<ProviderStep>,
}

#[derive(Debug, Deserialize)]
struct ProviderStep {
    start_location: Coordinate,
    end_location: Coordinate,
    #[serde(default)]
    html_instructions: String,
    #[serde(default)]
    distance: ProviderValue,
    #[serde(default)]
    duration: ProviderValue,
    #[serde(default)]
    maneuver: Option<String>,
}

/// `{ "value": 120, "text": "0.1 km" }`; only the numeric value is used.
#[derive(Debug, Default, Deserialize)]
struct ProviderValue {
    #[serde(default)]
    value: u64,
}

impl ProviderRoute {
    fn into_raw(self) -> RawRoute {
        RawRoute {
            legs: self.legs.into_iter().map(ProviderLeg::into_leg).collect(),
        }
    }
}

impl ProviderLeg {
    fn into_leg(self) -> Leg {
        Leg {
            end: self.end_location,
            steps: self
                .steps
                .into_iter()
                .map(|step| Step {
                    start: step.start_location,
                    end: step.end_location,
                    markup: step.html_instructions,
                    distance_meters: step.distance.value,
                    duration_seconds: step.duration.value,
                    maneuver: step.maneuver.unwrap_or_default(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ElevationResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<ElevationResult>,
}

#[derive(Debug, Deserialize)]
struct ElevationResult {
    elevation: f64,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    formatted_address: String,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

impl GeocodeResult {
    fn label(&self) -> String {
        self.address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == ROUTE_COMPONENT))
            .map(|c| c.long_name.clone())
            .unwrap_or_else(|| self.formatted_address.clone())
    }
}
