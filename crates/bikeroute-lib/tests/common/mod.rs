//! Common test utilities and fixture builders.

use bikeroute_lib::{Coordinate, Leg, Step, Waypoint};

/// Roughly one meter of latitude, in degrees.
#[allow(dead_code)]
pub const METER: f64 = 1.0 / 111_195.0;

/// Coordinate `north_m` meters north and `east_m` meters east of the equator
/// at the prime meridian. Accurate enough for the tens of meters tests use.
#[allow(dead_code)]
pub fn offset(north_m: f64, east_m: f64) -> Coordinate {
    Coordinate::new(north_m * METER, east_m * METER)
}

/// Waypoint at a metric offset with a label.
#[allow(dead_code)]
pub fn point(north_m: f64, east_m: f64, label: &str) -> Waypoint {
    Waypoint::new(offset(north_m, east_m), label, 0.0)
}

/// Waypoints along a straight northbound line, one per `north_m` value,
/// each with a distinct label.
#[allow(dead_code)]
pub fn line(north_m: &[f64]) -> Vec<Waypoint> {
    north_m
        .iter()
        .enumerate()
        .map(|(i, &n)| point(n, 0.0, &format!("p{}", i)))
        .collect()
}

/// Builder for provider steps with sensible defaults.
#[allow(dead_code)]
pub struct StepBuilder {
    step: Step,
}

#[allow(dead_code)]
impl StepBuilder {
    #[must_use]
    pub fn new(start: Coordinate, end: Coordinate) -> Self {
        Self {
            step: Step {
                start,
                end,
                markup: "Continue straight".to_string(),
                distance_meters: 100,
                duration_seconds: 20,
                maneuver: String::new(),
            },
        }
    }

    pub fn markup(mut self, markup: &str) -> Self {
        self.step.markup = markup.to_string();
        self
    }

    pub fn distance(mut self, meters: u64) -> Self {
        self.step.distance_meters = meters;
        self
    }

    pub fn duration(mut self, seconds: u64) -> Self {
        self.step.duration_seconds = seconds;
        self
    }

    pub fn maneuver(mut self, maneuver: &str) -> Self {
        self.step.maneuver = maneuver.to_string();
        self
    }

    pub fn build(self) -> Step {
        self.step
    }
}

/// Leg made of `steps`, ending at the last step's end (or `fallback_end`).
#[allow(dead_code)]
pub fn leg(steps: Vec<Step>, fallback_end: Coordinate) -> Leg {
    let end = steps.last().map(|s| s.end).unwrap_or(fallback_end);
    Leg { steps, end }
}
