//! Great-circle primitives on a spherical Earth.

use super::point::GeoPoint;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters.
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Initial bearing from `a` towards `b`, in radians clockwise from north.
pub fn initial_bearing(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    y.atan2(x)
}

/// Point reached by travelling `distance_m` from `origin` along `bearing_rad`.
/// The longitude is wrapped into [-180, 180).
pub fn destination(origin: GeoPoint, distance_m: f64, bearing_rad: f64) -> GeoPoint {
    let lat1 = origin.latitude.to_radians();
    let lon1 = origin.longitude.to_radians();
    let angular = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing_rad.cos()).asin();
    let lon2 = lon1
        + (bearing_rad.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    let longitude = (lon2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    GeoPoint::new(lat2.to_degrees(), longitude)
}
