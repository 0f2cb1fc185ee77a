pub mod cache;
pub mod error;
pub mod geocode;
pub mod provider;
pub mod route;
pub mod service;

pub use cache::GeoCache;
pub use error::RoutingError;
pub use geocode::{resolve_location, CachedGeocoder};
pub use provider::{HybridOrsProvider, LocalOrsProvider, RemoteOrsProvider};
pub use route::{plan_route, PlannedRoute, RouteGeometry, RouteSummary, ViaPolicy};
pub use service::{Geocoder, Router, RoutingProvider};
