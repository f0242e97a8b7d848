//! Value types shared by the refinement pipeline and the service wire format.
//!
//! Field names and nesting of the serialised types form the JSON contract
//! consumed by clients.

use serde::{Deserialize, Serialize};

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// One point of the display polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    #[serde(flatten)]
    pub position: Coordinate,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Elevation in meters.
    pub elevation: f64,
    #[serde(rename = "is_down_hill")]
    pub is_downhill: bool,
}

impl Waypoint {
    pub fn new(position: Coordinate, description: impl Into<String>, elevation: f64) -> Self {
        Self {
            position,
            description: description.into(),
            elevation,
            is_downhill: false,
        }
    }
}

/// Turn-by-turn entry carrying the distance and time travelled before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Provider instruction text with its HTML markup stripped.
    pub instruction: String,
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub maneuver: String,
    pub street_name: String,
    pub start_location: Coordinate,
}

/// A refined alternative route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// 1-based position among the provider's alternatives.
    pub id: usize,
    pub points: Vec<Waypoint>,
    pub instructions: Vec<Instruction>,
}

/// Every refined alternative for a single request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSet {
    pub routes: Vec<Route>,
}

/// Smallest movement unit reported by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub start: Coordinate,
    pub end: Coordinate,
    /// Instruction text with inline markup, e.g. `Turn <b>left</b> onto <b>Market St</b>`.
    pub markup: String,
    pub distance_meters: u64,
    pub duration_seconds: u64,
    /// Provider maneuver tag such as `turn-left`; empty when absent.
    pub maneuver: String,
}

/// Origin-to-destination segment of a raw route.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub steps: Vec<Step>,
    pub end: Coordinate,
}

/// One alternative exactly as the provider split it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRoute {
    pub legs: Vec<Leg>,
}
