pub mod sdk;

pub use sdk::check::{check_route, CheckError, RouteCheck, RouteCheckRequest};
pub use sdk::classify::{classify_deliveries, Classification, ClassificationCounts, ClassifiedDelivery};
pub use sdk::config::OrsConfig;
pub use sdk::deliveries::{Delivery, DeliveryLookup, DeliveryStore};
pub use sdk::geo::{
    build_buffer, destination, distance_to_route, haversine_distance, initial_bearing, GeoPoint,
    Polyline, RouteBuffer,
};
pub use sdk::routing::{GeoCache, Geocoder, Router, RoutingError, ViaPolicy};
