//! Request types and validation for HTTP endpoints.

use bikeroute_lib::{Coordinate, DirectionsQuery, SimplifyThresholds};
use serde::{Deserialize, Serialize};

use crate::ProblemDetails;

/// Validation trait for request types.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    ///
    /// The `request_id` is used to populate the `instance` field of any
    /// returned `ProblemDetails`.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Request for bicycling directions from a position to a destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Starting position.
    #[serde(alias = "Origin")]
    pub origin: Coordinate,

    /// Free-text destination (address or place name).
    #[serde(alias = "Destination")]
    pub destination: String,

    /// Ask the provider for alternative routes.
    #[serde(default)]
    pub alternatives: bool,

    /// Overrides the deployment's decimation threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_spacing_meters: Option<f64>,

    /// Overrides the deployment's zigzag threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zigzag_meters: Option<f64>,
}

impl RouteRequest {
    /// Thresholds for this request, falling back to `defaults` per field.
    pub fn thresholds(&self, defaults: SimplifyThresholds) -> SimplifyThresholds {
        SimplifyThresholds::new(
            self.min_spacing_meters
                .unwrap_or(defaults.min_spacing_meters),
            self.zigzag_meters.unwrap_or(defaults.zigzag_meters),
        )
    }

    /// Provider query for this request.
    pub fn directions_query(&self) -> DirectionsQuery {
        DirectionsQuery::new(self.origin, self.destination.trim())
            .with_alternatives(self.alternatives)
    }
}

impl Validate for RouteRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        let Coordinate { lat, lng } = self.origin;

        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'origin.lat' field must be between -90 and 90",
                request_id,
            )));
        }

        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'origin.lng' field must be between -180 and 180",
                request_id,
            )));
        }

        if self.destination.trim().is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'destination' field is required and cannot be empty",
                request_id,
            )));
        }

        for (name, value) in [
            ("min_spacing_meters", self.min_spacing_meters),
            ("zigzag_meters", self.zigzag_meters),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(Box::new(ProblemDetails::bad_request(
                        format!("The '{}' field must be a positive number", name),
                        request_id,
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RouteRequest {
        RouteRequest {
            origin: Coordinate::new(43.8231, -111.7924),
            destination: "BYU-Idaho".to_string(),
            alternatives: false,
            min_spacing_meters: None,
            zigzag_meters: None,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate("req").is_ok());
    }

    #[test]
    fn test_deserialize_lowercase_and_aliases() {
        let lower: RouteRequest = serde_json::from_str(
            r#"{"origin":{"lat":43.8,"lng":-111.7},"destination":"Rexburg"}"#,
        )
        .unwrap();
        assert_eq!(lower.destination, "Rexburg");
        assert!(!lower.alternatives);

        let capitalised: RouteRequest = serde_json::from_str(
            r#"{"Origin":{"lat":43.8,"lng":-111.7},"Destination":"Rexburg","alternatives":true}"#,
        )
        .unwrap();
        assert_eq!(capitalised.origin, Coordinate::new(43.8, -111.7));
        assert!(capitalised.alternatives);
    }

    #[test]
    fn test_missing_destination_fails_deserialization() {
        let result: Result<RouteRequest, _> =
            serde_json::from_str(r#"{"origin":{"lat":1.0,"lng":2.0}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_destination_rejected() {
        let mut req = request();
        req.destination = "   ".to_string();
        let problem = req.validate("req-1").unwrap_err();
        assert_eq!(problem.status, 400);
        assert!(problem.detail.unwrap().contains("destination"));
    }

    #[test]
    fn test_out_of_range_origin_rejected() {
        let mut req = request();
        req.origin = Coordinate::new(91.0, 0.0);
        assert!(req.validate("req").is_err());

        req.origin = Coordinate::new(0.0, -180.5);
        assert!(req.validate("req").is_err());

        req.origin = Coordinate::new(f64::NAN, 0.0);
        assert!(req.validate("req").is_err());
    }

    #[test]
    fn test_non_positive_thresholds_rejected() {
        let mut req = request();
        req.zigzag_meters = Some(0.0);
        let problem = req.validate("req").unwrap_err();
        assert!(problem.detail.unwrap().contains("zigzag_meters"));

        let mut req = request();
        req.min_spacing_meters = Some(-5.0);
        assert!(req.validate("req").is_err());
    }

    #[test]
    fn test_thresholds_fall_back_per_field() {
        let defaults = SimplifyThresholds::new(15.0, 30.0);
        let mut req = request();
        assert_eq!(req.thresholds(defaults), defaults);

        req.zigzag_meters = Some(50.0);
        assert_eq!(req.thresholds(defaults), SimplifyThresholds::new(15.0, 50.0));
    }

    #[test]
    fn test_directions_query_trims_destination() {
        let mut req = request();
        req.destination = "  Rexburg  ".to_string();
        req.alternatives = true;

        let query = req.directions_query();
        assert_eq!(query.destination, "Rexburg");
        assert!(query.alternatives);
        assert_eq!(query.origin, req.origin);
    }
}
