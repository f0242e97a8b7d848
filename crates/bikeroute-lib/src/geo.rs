//! Great-circle distance used by every refinement stage.

use crate::model::Coordinate;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance between two coordinates, in meters.
///
/// Symmetric and exactly zero for identical inputs. The intermediate term is
/// clamped to `[0, 1]` so rounding on antipodal points cannot produce NaN.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_apart() {
        let rexburg = Coordinate::new(43.8231, -111.7924);
        assert_eq!(distance(rexburg, rexburg), 0.0);
        assert_eq!(distance(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.0)), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(37.7749, -122.4194);
        let b = Coordinate::new(37.7793, -122.4192);
        assert_eq!(distance(a, b), distance(b, a));
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = distance(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 111_195.0).abs() < 1.0, "got {d}");
    }

    #[test]
    fn antipodal_points_are_half_the_circumference() {
        let d = distance(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0));
        let half = std::f64::consts::PI * EARTH_RADIUS_METERS;
        assert!((d - half).abs() < 1e-3, "got {d}");
        assert!(d.is_finite());
    }

    #[test]
    fn short_hop_across_the_antimeridian() {
        let d = distance(Coordinate::new(0.0, 179.9999), Coordinate::new(0.0, -179.9999));
        assert!(d < 30.0, "got {d}");
    }
}
