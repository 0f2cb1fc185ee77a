use crate::sdk::geo::GeoPoint;
use crate::sdk::routing::error::RoutingError;
use crate::sdk::routing::route::RouteGeometry;
use crate::sdk::routing::service::{Geocoder, Router};

use super::local::LocalOrsProvider;
use super::remote::RemoteOrsProvider;

/// Geocodes against the hosted API and routes against a local instance.
pub struct HybridOrsProvider {
    remote: RemoteOrsProvider,
    local: LocalOrsProvider,
}

impl HybridOrsProvider {
    pub fn new(remote: RemoteOrsProvider, local: LocalOrsProvider) -> Self {
        Self { remote, local }
    }
}

impl Geocoder for HybridOrsProvider {
    fn geocode(&self, address: &str) -> Result<GeoPoint, RoutingError> {
        log::debug!("[Hybrid Provider] Using REMOTE for geocode");
        self.remote.geocode(address)
    }
}

impl Router for HybridOrsProvider {
    fn route(&self, waypoints: &[GeoPoint]) -> Result<RouteGeometry, RoutingError> {
        log::debug!("[Hybrid Provider] Using LOCAL for route");
        self.local.route(waypoints)
    }
}
