pub mod buffer;
pub mod point;
pub mod route_distance;
pub mod sphere;

pub use buffer::{build_buffer, simplify, RouteBuffer};
pub use point::{CoordinateParseError, GeoPoint, Polyline};
pub use route_distance::{distance_to_route, distance_to_segment};
pub use sphere::{destination, haversine_distance, initial_bearing, EARTH_RADIUS_M};
