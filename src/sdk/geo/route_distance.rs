use super::{
    point::{GeoPoint, Polyline},
    sphere::haversine_distance,
};

/// Distance in meters from `point` to the segment `a -> b`.
///
/// The foot of the perpendicular is found in the raw (lat, lon) plane and the
/// haversine distance to it is returned. At buffer scales the planar error is
/// negligible.
pub fn distance_to_segment(point: GeoPoint, a: GeoPoint, b: GeoPoint) -> f64 {
    let dx = b.latitude - a.latitude;
    let dy = b.longitude - a.longitude;
    let len_sq = dx * dx + dy * dy;

    let t = if len_sq == 0.0 {
        0.0
    } else {
        let dot = (point.latitude - a.latitude) * dx + (point.longitude - a.longitude) * dy;
        (dot / len_sq).clamp(0.0, 1.0)
    };

    let foot = GeoPoint::new(a.latitude + t * dx, a.longitude + t * dy);
    haversine_distance(point, foot)
}

/// Minimum distance in meters from `point` to any vertex or segment of `route`.
/// An empty route is infinitely far away.
pub fn distance_to_route(point: GeoPoint, route: &Polyline) -> f64 {
    let to_vertices = route
        .points()
        .iter()
        .map(|vertex| haversine_distance(point, *vertex));
    let to_segments = route
        .segments()
        .map(|(a, b)| distance_to_segment(point, a, b));

    to_vertices.chain(to_segments).fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_route() -> Polyline {
        Polyline::new(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)])
    }

    #[test]
    fn empty_route_is_infinitely_far() {
        let distance = distance_to_route(GeoPoint::new(1.0, 1.0), &Polyline::default());
        assert!(distance.is_infinite());
    }

    #[test]
    fn single_vertex_route_uses_vertex_distance() {
        let vertex = GeoPoint::new(45.0, 5.0);
        let point = GeoPoint::new(45.01, 5.0);
        let route = Polyline::new(vec![vertex]);
        assert_eq!(distance_to_route(point, &route), haversine_distance(point, vertex));
    }

    #[test]
    fn point_beside_midpoint_projects_onto_segment() {
        let point = GeoPoint::new(0.0001, 0.5);
        let expected = haversine_distance(point, GeoPoint::new(0.0, 0.5));
        let distance = distance_to_route(point, &straight_route());
        assert!((distance - expected).abs() / expected < 0.01, "{distance}");
        assert!(distance > 11.0 && distance < 11.3, "{distance}");
    }

    #[test]
    fn projection_is_clamped_to_segment_ends() {
        let point = GeoPoint::new(0.0, 1.5);
        let distance = distance_to_route(point, &straight_route());
        let to_end = haversine_distance(point, GeoPoint::new(0.0, 1.0));
        assert!((distance - to_end).abs() < 1e-6);
    }

    #[test]
    fn degenerate_segment_falls_back_to_its_start() {
        let a = GeoPoint::new(10.0, 10.0);
        let point = GeoPoint::new(10.5, 10.0);
        assert_eq!(distance_to_segment(point, a, a), haversine_distance(point, a));
    }

    #[test]
    fn never_exceeds_any_vertex_distance() {
        let route = Polyline::new(vec![
            GeoPoint::new(48.11, -1.68),
            GeoPoint::new(48.20, -1.50),
            GeoPoint::new(48.30, -1.60),
            GeoPoint::new(48.35, -1.20),
        ]);
        let probes = [
            GeoPoint::new(48.0, -1.0),
            GeoPoint::new(48.25, -1.55),
            GeoPoint::new(49.0, -2.0),
        ];
        for probe in probes {
            let distance = distance_to_route(probe, &route);
            for vertex in route.points() {
                assert!(distance <= haversine_distance(probe, *vertex));
            }
        }
    }

    #[test]
    fn points_on_the_route_are_at_zero() {
        let route = straight_route();
        assert_eq!(distance_to_route(GeoPoint::new(0.0, 0.25), &route), 0.0);
    }
}
