//! Per-coordinate collaborator lookups.
//!
//! The aggregator only needs two narrow capabilities: an elevation for a
//! coordinate and a reverse-geocoded label for it. Both are modelled as
//! infallible `Option` lookups; a failed or missing lookup is simply `None`.
//! [`ResolvedLookups`] is the in-memory table the service fills ahead of the
//! (synchronous) fold, and the one tests populate by hand.

use std::collections::HashMap;

use crate::model::Coordinate;

/// Elevation source, in meters.
pub trait ElevationLookup {
    fn elevation(&self, at: Coordinate) -> Option<f64>;
}

/// Reverse-geocoded label source.
pub trait LabelLookup {
    fn label(&self, at: Coordinate) -> Option<String>;
}

/// Exact-match key for a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CoordinateKey(u64, u64);

impl From<Coordinate> for CoordinateKey {
    fn from(value: Coordinate) -> Self {
        // Fold -0.0 into 0.0 so both spellings hit the same entry.
        Self((value.lat + 0.0).to_bits(), (value.lng + 0.0).to_bits())
    }
}

/// Pre-resolved lookup results keyed by exact coordinate.
#[derive(Debug, Clone, Default)]
pub struct ResolvedLookups {
    elevations: HashMap<CoordinateKey, f64>,
    labels: HashMap<CoordinateKey, String>,
}

impl ResolvedLookups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_elevation(&mut self, at: Coordinate, meters: f64) {
        self.elevations.insert(at.into(), meters);
    }

    pub fn insert_label(&mut self, at: Coordinate, label: impl Into<String>) {
        self.labels.insert(at.into(), label.into());
    }

    /// Builder-style variant of [`ResolvedLookups::insert_elevation`].
    pub fn with_elevation(mut self, at: Coordinate, meters: f64) -> Self {
        self.insert_elevation(at, meters);
        self
    }

    /// Builder-style variant of [`ResolvedLookups::insert_label`].
    pub fn with_label(mut self, at: Coordinate, label: impl Into<String>) -> Self {
        self.insert_label(at, label);
        self
    }

    pub fn elevation_count(&self) -> usize {
        self.elevations.len()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }
}

impl ElevationLookup for ResolvedLookups {
    fn elevation(&self, at: Coordinate) -> Option<f64> {
        self.elevations.get(&at.into()).copied()
    }
}

impl LabelLookup for ResolvedLookups {
    fn label(&self, at: Coordinate) -> Option<String> {
        self.labels.get(&at.into()).cloned()
    }
}
