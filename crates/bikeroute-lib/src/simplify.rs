//! Polyline simplification.
//!
//! Three order-preserving stages reduce the raw waypoint list before it is
//! sent to clients:
//!
//! 1. [`decimate`] drops interior points closer than `min_spacing_meters` to
//!    the previously kept point.
//! 2. [`remove_zigzags`] drops short detours that come straight back.
//! 3. [`merge_duplicate_labels`] collapses runs of points sharing a label.
//!
//! Every stage is total: empty, singleton and two-point inputs pass through
//! unchanged, and no stage ever returns more points than it was given.

use serde::{Deserialize, Serialize};

use crate::geo::distance;
use crate::model::Waypoint;

/// Distance thresholds driving [`simplify`].
///
/// There is no canonical value; deployments have used anywhere from 15 m to
/// 50 m, so callers always pass them in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimplifyThresholds {
    /// Minimum spacing between kept points.
    pub min_spacing_meters: f64,
    /// Detours whose endpoints are closer than this are removed.
    pub zigzag_meters: f64,
}

impl SimplifyThresholds {
    pub fn new(min_spacing_meters: f64, zigzag_meters: f64) -> Self {
        Self {
            min_spacing_meters,
            zigzag_meters,
        }
    }
}

/// Run all three stages in order.
pub fn simplify(points: &[Waypoint], thresholds: &SimplifyThresholds) -> Vec<Waypoint> {
    let decimated = decimate(points, thresholds.min_spacing_meters);
    let straightened = remove_zigzags(&decimated, thresholds.zigzag_meters);
    merge_duplicate_labels(&straightened)
}

/// Keep the endpoints and every interior point at least `min_spacing` meters
/// from the last kept point.
pub fn decimate(points: &[Waypoint], min_spacing: f64) -> Vec<Waypoint> {
    let [first, interior @ .., last] = points else {
        return points.to_vec();
    };

    let mut kept = vec![first.clone()];
    let mut anchor = first;

    for point in interior {
        if distance(anchor.position, point.position) >= min_spacing {
            kept.push(point.clone());
            anchor = point;
        }
    }

    kept.push(last.clone());
    kept
}

/// Remove interior points that form a short out-and-back detour.
///
/// A point is dropped when the direct hop from the last kept point to the
/// following raw point is shorter than both legs through it and shorter
/// than `threshold`.
pub fn remove_zigzags(points: &[Waypoint], threshold: f64) -> Vec<Waypoint> {
    let [first, .., last] = points else {
        return points.to_vec();
    };

    let mut kept = vec![first.clone()];
    let mut prev = first;

    for window in points.windows(2).skip(1) {
        let (curr, next) = (&window[0], &window[1]);

        let to_curr = distance(prev.position, curr.position);
        let from_curr = distance(curr.position, next.position);
        let back = distance(prev.position, next.position);

        if back < to_curr && back < from_curr && back < threshold {
            continue;
        }

        kept.push(curr.clone());
        prev = curr;
    }

    kept.push(last.clone());
    kept
}

/// Collapse each run of consecutive points with the same description into
/// the first point of the run.
pub fn merge_duplicate_labels(points: &[Waypoint]) -> Vec<Waypoint> {
    let mut merged = points.to_vec();
    merged.dedup_by(|later, earlier| later.description == earlier.description);
    merged
}
