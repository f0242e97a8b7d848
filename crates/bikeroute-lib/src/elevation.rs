use crate::model::Waypoint;

/// Flag every point whose successor sits lower as downhill.
///
/// The final point has no successor and keeps whatever flag it arrived with.
pub fn annotate_downhill(mut points: Vec<Waypoint>) -> Vec<Waypoint> {
    for i in 1..points.len() {
        let next_elevation = points[i].elevation;
        let current = &mut points[i - 1];
        current.is_downhill = next_elevation < current.elevation;
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinate;

    fn at_elevations(elevations: &[f64]) -> Vec<Waypoint> {
        elevations
            .iter()
            .enumerate()
            .map(|(i, &e)| Waypoint::new(Coordinate::new(i as f64 * 0.001, 0.0), "", e))
            .collect()
    }

    fn flags(points: &[Waypoint]) -> Vec<bool> {
        points.iter().map(|p| p.is_downhill).collect()
    }

    #[test]
    fn descending_then_climbing() {
        let annotated = annotate_downhill(at_elevations(&[10.0, 8.0, 12.0]));
        assert_eq!(flags(&annotated), vec![true, false, false]);
    }

    #[test]
    fn last_point_keeps_its_default() {
        let mut points = at_elevations(&[5.0, 9.0]);
        points[1].is_downhill = true;

        let annotated = annotate_downhill(points);
        assert!(!annotated[0].is_downhill);
        assert!(annotated[1].is_downhill, "last flag must be untouched");
    }

    #[test]
    fn equal_elevation_is_not_downhill() {
        let annotated = annotate_downhill(at_elevations(&[7.0, 7.0, 7.0]));
        assert_eq!(flags(&annotated), vec![false, false, false]);
    }

    #[test]
    fn existing_flags_are_recomputed() {
        let mut points = at_elevations(&[1.0, 2.0, 3.0]);
        points[0].is_downhill = true;

        let annotated = annotate_downhill(points);
        assert!(!annotated[0].is_downhill);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(annotate_downhill(Vec::new()).is_empty());

        let single = annotate_downhill(at_elevations(&[100.0]));
        assert_eq!(flags(&single), vec![false]);
    }
}
