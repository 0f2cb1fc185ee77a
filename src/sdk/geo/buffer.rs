//! Constant-width buffer polygons around a route, for rendering.
//!
//! Each vertex of a thinned copy of the route is pushed `width_m` to both
//! sides along a perpendicular bearing. Interior vertices use the plain mean
//! of the incoming and outgoing bearings, so sharp switchbacks can produce a
//! narrowed or self-intersecting ring. That shape is kept as is.
//!
//! Offset points are valid coordinates, but a route close to the antimeridian
//! yields a ring whose longitudes jump from +180 to -180. The ring is not split.

use std::f64::consts::FRAC_PI_2;

use super::{
    point::{GeoPoint, Polyline},
    sphere::{destination, initial_bearing},
};

/// Upper bound (approximately) on the vertices kept by [`simplify`].
pub const MAX_BUFFER_VERTICES: usize = 100;

/// Keeps every `k`-th vertex, `k = max(1, n / 100)`, plus the final vertex.
pub fn simplify(points: &[GeoPoint]) -> Vec<GeoPoint> {
    let Some(last_index) = points.len().checked_sub(1) else {
        return Vec::new();
    };
    let stride = (points.len() / MAX_BUFFER_VERTICES).max(1);

    let mut kept: Vec<GeoPoint> = points.iter().copied().step_by(stride).collect();
    if last_index % stride != 0 {
        kept.push(points[last_index]);
    }
    kept
}

/// Bearing the offsets are taken perpendicular to, for vertex `i`.
fn heading_at(points: &[GeoPoint], i: usize) -> f64 {
    let last = points.len() - 1;
    if i == 0 {
        initial_bearing(points[0], points[1])
    } else if i == last {
        initial_bearing(points[last - 1], points[last])
    } else {
        let incoming = initial_bearing(points[i - 1], points[i]);
        let outgoing = initial_bearing(points[i], points[i + 1]);
        (incoming + outgoing) / 2.0
    }
}

/// Builds the buffer ring: left offsets in route order followed by right
/// offsets in reverse. The ring is implicitly closed. Returns `None` for
/// routes with fewer than two vertices.
pub fn build_buffer(route: &Polyline, width_m: f64) -> Option<Vec<GeoPoint>> {
    if route.len() < 2 {
        return None;
    }

    let simplified = simplify(route.points());
    let mut left = Vec::with_capacity(simplified.len());
    let mut right = Vec::with_capacity(simplified.len());

    for (i, vertex) in simplified.iter().enumerate() {
        let heading = heading_at(&simplified, i);
        left.push(destination(*vertex, width_m, heading + FRAC_PI_2));
        right.push(destination(*vertex, width_m, heading - FRAC_PI_2));
    }

    log::debug!(
        "Buffer of {} m built from {} of {} route vertices",
        width_m,
        simplified.len(),
        route.len()
    );

    left.extend(right.into_iter().rev());
    Some(left)
}

/// Holds the current route and width together with the last buffer built from
/// them. Callers invoke [`RouteBuffer::on_viewport_change`] when the map is
/// panned or zoomed; the geometry does not depend on the viewport.
#[derive(Debug, Clone)]
pub struct RouteBuffer {
    route: Polyline,
    width_m: f64,
    polygon: Option<Vec<GeoPoint>>,
}

impl RouteBuffer {
    pub fn new(route: Polyline, width_m: f64) -> Self {
        let polygon = build_buffer(&route, width_m);
        Self {
            route,
            width_m,
            polygon,
        }
    }

    pub fn width_m(&self) -> f64 {
        self.width_m
    }

    pub fn polygon(&self) -> Option<&[GeoPoint]> {
        self.polygon.as_deref()
    }

    pub fn set_route(&mut self, route: Polyline) -> Option<&[GeoPoint]> {
        self.route = route;
        self.recompute()
    }

    /// Ignores widths that are negative or not finite.
    pub fn set_width(&mut self, width_m: f64) -> Option<&[GeoPoint]> {
        if width_m.is_finite() && width_m >= 0.0 {
            self.width_m = width_m;
        } else {
            log::warn!(
                "Ignoring buffer width {}, keeping {} m",
                width_m,
                self.width_m
            );
        }
        self.recompute()
    }

    pub fn on_viewport_change(&mut self) -> Option<&[GeoPoint]> {
        self.recompute()
    }

    fn recompute(&mut self) -> Option<&[GeoPoint]> {
        self.polygon = build_buffer(&self.route, self.width_m);
        self.polygon.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::geo::sphere::haversine_distance;

    fn line(n: usize) -> Vec<GeoPoint> {
        (0..n)
            .map(|i| GeoPoint::new(45.0, 5.0 + i as f64 * 0.001))
            .collect()
    }

    #[test]
    fn short_routes_have_no_buffer() {
        assert!(build_buffer(&Polyline::default(), 500.0).is_none());
        assert!(build_buffer(&Polyline::new(line(1)), 500.0).is_none());
    }

    #[test]
    fn two_point_route_gives_quadrilateral() {
        let route = Polyline::new(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)]);
        let ring = build_buffer(&route, 1_000.0).unwrap();
        assert_eq!(ring.len(), 4);

        // heading + 90 degrees comes first: south of an eastbound route
        let [start_left, end_left, end_right, start_right] = [ring[0], ring[1], ring[2], ring[3]];
        assert!(start_left.latitude < 0.0 && end_left.latitude < 0.0);
        assert!(start_right.latitude > 0.0 && end_right.latitude > 0.0);

        for (offset, anchor) in [
            (start_left, route.points()[0]),
            (end_left, route.points()[1]),
            (end_right, route.points()[1]),
            (start_right, route.points()[0]),
        ] {
            let distance = haversine_distance(offset, anchor);
            assert!((distance - 1_000.0).abs() < 0.01, "{distance}");
        }
    }

    #[test]
    fn simplify_keeps_small_routes() {
        let points = line(99);
        assert_eq!(simplify(&points), points);
    }

    #[test]
    fn simplify_strides_and_keeps_last_vertex() {
        let points = line(250);
        let kept = simplify(&points);
        // stride 2 over 250 points: indices 0, 2, .., 248, then 249
        assert_eq!(kept.len(), 126);
        assert_eq!(kept[1], points[2]);
        assert_eq!(kept.last(), points.last());
    }

    #[test]
    fn simplify_does_not_duplicate_last_vertex() {
        let points = line(201);
        let kept = simplify(&points);
        assert_eq!(kept.len(), 101);
        assert_eq!(kept.last(), points.last());
    }

    #[test]
    fn ring_has_two_offsets_per_kept_vertex() {
        let route = Polyline::new(line(250));
        let ring = build_buffer(&route, 200.0).unwrap();
        assert_eq!(ring.len(), 2 * 126);
    }

    #[test]
    fn interior_vertex_uses_averaged_heading() {
        // north then east: mean heading 45 degrees, first offset at 135
        let corner = GeoPoint::new(0.01, 0.0);
        let route = Polyline::new(vec![GeoPoint::new(0.0, 0.0), corner, GeoPoint::new(0.01, 0.01)]);
        let ring = build_buffer(&route, 100.0).unwrap();
        let left_corner = ring[1];
        let bearing = initial_bearing(corner, left_corner);
        assert!((bearing - 1.5 * FRAC_PI_2).abs() < 1e-3, "{bearing}");
    }

    #[test]
    fn route_buffer_recomputes_on_demand() {
        let mut buffer = RouteBuffer::new(Polyline::new(line(2)), 100.0);
        let first = buffer.polygon().unwrap().to_vec();

        assert_eq!(buffer.on_viewport_change().unwrap(), first.as_slice());

        let wider = buffer.set_width(300.0).unwrap().to_vec();
        assert_ne!(wider, first);
        assert_eq!(buffer.width_m(), 300.0);

        buffer.set_width(f64::NAN);
        assert_eq!(buffer.width_m(), 300.0);

        assert!(buffer.set_route(Polyline::new(line(1))).is_none());
        assert!(buffer.polygon().is_none());
    }
}
