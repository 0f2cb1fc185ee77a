use serde::Serialize;

use super::geocode::resolve_location;
use super::service::{Geocoder, Router};
use crate::sdk::check::CheckError;
use crate::sdk::geo::{GeoPoint, Polyline};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RouteSummary {
    pub distance_km: f64,
    pub duration_hours: f64,
}

impl RouteSummary {
    pub fn from_meters_seconds(distance_m: f64, duration_s: f64) -> Self {
        Self {
            distance_km: distance_m / 1000.0,
            duration_hours: duration_s / 3600.0,
        }
    }
}

/// Route geometry as returned by a [`Router`], already latitude-first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteGeometry {
    pub polyline: Polyline,
    pub summary: RouteSummary,
}

/// What to do when a via-point cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViaPolicy {
    /// Abort the whole request.
    #[default]
    Fail,
    /// Drop the via-point and route through the remaining ones.
    SkipUnresolved,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedRoute {
    pub start: GeoPoint,
    pub end: GeoPoint,
    pub vias: Vec<GeoPoint>,
    pub geometry: RouteGeometry,
}

impl PlannedRoute {
    /// Waypoints in the order they were sent to the router.
    pub fn waypoints(&self) -> Vec<GeoPoint> {
        let mut waypoints = Vec::with_capacity(self.vias.len() + 2);
        waypoints.push(self.start);
        waypoints.extend(self.vias.iter().copied());
        waypoints.push(self.end);
        waypoints
    }
}

/// Resolves start, end and via-points, then asks the router for a route
/// through them. Blank via entries are ignored.
pub fn plan_route<G, R>(
    start: &str,
    vias: &[String],
    end: &str,
    policy: ViaPolicy,
    geocoder: &G,
    router: &R,
) -> Result<PlannedRoute, CheckError>
where
    G: Geocoder + ?Sized,
    R: Router + ?Sized,
{
    let start_point = resolve_location(start, geocoder).map_err(CheckError::Start)?;
    let end_point = resolve_location(end, geocoder).map_err(CheckError::End)?;
    log::info!("Start resolved to {}, end resolved to {}", start_point, end_point);

    let mut via_points = Vec::new();
    for (index, via) in vias.iter().enumerate() {
        if via.trim().is_empty() {
            continue;
        }
        match resolve_location(via, geocoder) {
            Ok(point) => via_points.push(point),
            Err(source) if policy == ViaPolicy::SkipUnresolved => {
                log::warn!("Could not resolve via-point {} \"{}\": {}", index + 1, via, source);
            }
            Err(source) => return Err(CheckError::Via { index, source }),
        }
    }

    let mut planned = PlannedRoute {
        start: start_point,
        end: end_point,
        vias: via_points,
        geometry: RouteGeometry::default(),
    };
    planned.geometry = router
        .route(&planned.waypoints())
        .map_err(CheckError::Route)?;

    log::info!(
        "Route through {} waypoints: {} vertices, {:.1} km, {:.2} hrs",
        planned.vias.len() + 2,
        planned.geometry.polyline.len(),
        planned.geometry.summary.distance_km,
        planned.geometry.summary.duration_hours
    );
    Ok(planned)
}
