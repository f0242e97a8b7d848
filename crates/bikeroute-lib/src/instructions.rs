//! Turn-by-turn instruction aggregation.
//!
//! Walks the provider's legs and steps once, in order, and emits both the
//! instruction list and the raw (unsimplified) waypoint list for a route.
//! Distance and duration accumulate across the whole route: every
//! instruction carries the totals travelled *before* it, and each leg ends
//! with a synthetic arrival instruction carrying the totals after its last
//! step.

use std::collections::HashSet;

use crate::label::{resolve, strip_markup};
use crate::lookup::{ElevationLookup, LabelLookup};
use crate::model::{Coordinate, Instruction, Leg, Waypoint};

/// Maneuver tag of the synthetic end-of-leg instruction.
pub const ARRIVE_MANEUVER: &str = "arrive";

/// Label used when the end of a leg cannot be named.
pub const DEFAULT_DESTINATION: &str = "Destination";

/// Output of [`aggregate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub instructions: Vec<Instruction>,
    pub waypoints: Vec<Waypoint>,
}

/// Fold the legs of one route into instructions and raw waypoints.
pub fn aggregate<L>(legs: &[Leg], lookups: &L) -> Aggregation
where
    L: ElevationLookup + LabelLookup + ?Sized,
{
    let mut out = Aggregation::default();
    let mut distance_so_far = 0u64;
    let mut duration_so_far = 0u64;

    for leg in legs {
        for step in &leg.steps {
            let label = resolve(&step.markup, lookups.label(step.start).as_deref());

            out.instructions.push(Instruction {
                instruction: strip_markup(&step.markup),
                distance_meters: distance_so_far,
                duration_seconds: duration_so_far,
                maneuver: step.maneuver.clone(),
                street_name: label.clone(),
                start_location: step.start,
            });
            out.waypoints.push(Waypoint::new(
                step.start,
                label,
                lookups.elevation(step.start).unwrap_or(0.0),
            ));

            distance_so_far = distance_so_far.saturating_add(step.distance_meters);
            duration_so_far = duration_so_far.saturating_add(step.duration_seconds);
        }

        let mut destination = resolve("", lookups.label(leg.end).as_deref());
        if destination.is_empty() {
            destination = DEFAULT_DESTINATION.to_string();
        }

        out.instructions.push(Instruction {
            instruction: format!("Arrive at {}", destination),
            distance_meters: distance_so_far,
            duration_seconds: duration_so_far,
            maneuver: ARRIVE_MANEUVER.to_string(),
            street_name: destination.clone(),
            start_location: leg.end,
        });
        out.waypoints.push(Waypoint::new(
            leg.end,
            destination,
            lookups.elevation(leg.end).unwrap_or(0.0),
        ));
    }

    out
}

/// Every coordinate [`aggregate`] will look up, first-seen order, no repeats.
///
/// Accepts the legs of one route or, flattened, of several alternatives.
pub fn lookup_points<'a, I>(legs: I) -> Vec<Coordinate>
where
    I: IntoIterator<Item = &'a Leg>,
{
    let mut seen = HashSet::new();
    legs.into_iter()
        .flat_map(|leg| {
            leg.steps
                .iter()
                .map(|step| step.start)
                .chain(std::iter::once(leg.end))
        })
        .filter(|c| seen.insert(((c.lat + 0.0).to_bits(), (c.lng + 0.0).to_bits())))
        .collect()
}
