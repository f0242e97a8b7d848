//! Assemble refined routes from raw provider routes.

use tracing::debug;

use crate::elevation::annotate_downhill;
use crate::instructions::aggregate;
use crate::lookup::{ElevationLookup, LabelLookup};
use crate::model::{RawRoute, Route, RouteSet};
use crate::simplify::{simplify, SimplifyThresholds};

/// Refine a single alternative: aggregate, simplify, then annotate.
pub fn refine_route<L>(id: usize, raw: &RawRoute, lookups: &L, thresholds: &SimplifyThresholds) -> Route
where
    L: ElevationLookup + LabelLookup + ?Sized,
{
    let aggregation = aggregate(&raw.legs, lookups);
    let raw_points = aggregation.waypoints.len();
    let points = annotate_downhill(simplify(&aggregation.waypoints, thresholds));

    debug!(
        route_id = id,
        raw_points,
        kept_points = points.len(),
        instructions = aggregation.instructions.len(),
        "route refined"
    );

    Route {
        id,
        points,
        instructions: aggregation.instructions,
    }
}

/// Refine every alternative, numbering them from 1 in provider order.
pub fn refine_routes<L>(raws: &[RawRoute], lookups: &L, thresholds: &SimplifyThresholds) -> RouteSet
where
    L: ElevationLookup + LabelLookup + ?Sized,
{
    RouteSet {
        routes: raws
            .iter()
            .enumerate()
            .map(|(index, raw)| refine_route(index + 1, raw, lookups, thresholds))
            .collect(),
    }
}
