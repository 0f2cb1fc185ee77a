use super::error::RoutingError;
use super::route::RouteGeometry;
use crate::sdk::geo::GeoPoint;

pub trait Geocoder: Send + Sync {
    /// Geocodes a free-text address to a latitude-first coordinate.
    fn geocode(&self, address: &str) -> Result<GeoPoint, RoutingError>;
}

pub trait Router: Send + Sync {
    /// Gets a driving route through the waypoints, in the given order.
    fn route(&self, waypoints: &[GeoPoint]) -> Result<RouteGeometry, RoutingError>;
}

/// A backend able to both geocode and route, such as an ORS instance.
pub trait RoutingProvider: Geocoder + Router {}

impl<T: Geocoder + Router> RoutingProvider for T {}

impl<F> Geocoder for F
where
    F: Fn(&str) -> Result<GeoPoint, RoutingError> + Send + Sync,
{
    fn geocode(&self, address: &str) -> Result<GeoPoint, RoutingError> {
        self(address)
    }
}
