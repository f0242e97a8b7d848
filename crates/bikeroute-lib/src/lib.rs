//! Bike route library entry points.
//!
//! This crate turns the raw directions returned by a maps provider into the
//! cleaned-up route description served to clients: a simplified polyline
//! with street labels and downhill flags, plus cumulative turn-by-turn
//! instructions. The refinement stages are pure functions; the provider
//! client and notifier are the only modules that perform I/O.
//!
//! A request runs [`MapsClient::directions`], then [`resolve_lookups`] over
//! [`lookup_points`], then [`refine_routes`].

#![deny(warnings)]

pub mod elevation;
pub mod error;
pub mod geo;
pub mod instructions;
pub mod label;
pub mod lookup;
pub mod model;
pub mod notify;
pub mod pipeline;
pub mod provider;
pub mod simplify;

pub use elevation::annotate_downhill;
pub use error::{Error, Result};
pub use geo::{distance, EARTH_RADIUS_METERS};
pub use instructions::{aggregate, lookup_points, Aggregation, ARRIVE_MANEUVER, DEFAULT_DESTINATION};
pub use label::{resolve, strip_markup};
pub use lookup::{ElevationLookup, LabelLookup, ResolvedLookups};
pub use model::{Coordinate, Instruction, Leg, RawRoute, Route, RouteSet, Step, Waypoint};
pub use notify::{Notification, NotificationKind, Notifier};
pub use pipeline::{refine_route, refine_routes};
pub use provider::{resolve_lookups, DirectionsQuery, MapsClient};
pub use simplify::{decimate, merge_duplicate_labels, remove_zigzags, simplify, SimplifyThresholds};
