use serde::Serialize;
use thiserror::Error;

use super::classify::{classify_deliveries, Classification};
use super::deliveries::{DeliveryStore, DeliveryStoreError};
use super::geo::{build_buffer, GeoPoint};
use super::routing::error::RoutingError;
use super::routing::route::{plan_route, PlannedRoute, ViaPolicy};
use super::routing::service::{Geocoder, Router};

/// Failures that leave nothing to classify against.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Could not resolve start location: {0}")]
    Start(#[source] RoutingError),

    #[error("Could not resolve end location: {0}")]
    End(#[source] RoutingError),

    #[error("Could not resolve via-point {}: {source}", .index + 1)]
    Via {
        index: usize,
        #[source]
        source: RoutingError,
    },

    #[error("Failed to generate route: {0}")]
    Route(#[source] RoutingError),

    #[error("Failed to load deliveries: {0}")]
    Deliveries(#[from] DeliveryStoreError),
}

#[derive(Debug, Clone)]
pub struct RouteCheckRequest {
    pub start: String,
    pub vias: Vec<String>,
    pub end: String,
    pub zone: String,
    pub buffer_m: f64,
    pub via_policy: ViaPolicy,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteCheck {
    pub route: PlannedRoute,
    pub buffer_m: f64,
    pub buffer_polygon: Option<Vec<GeoPoint>>,
    pub classification: Classification,
}

/// Plans the route, loads the zone's deliveries and classifies them against
/// the route buffer.
pub fn check_route<G, R, S>(
    request: &RouteCheckRequest,
    geocoder: &G,
    router: &R,
    store: &S,
) -> Result<RouteCheck, CheckError>
where
    G: Geocoder + ?Sized,
    R: Router + ?Sized,
    S: DeliveryStore + ?Sized,
{
    let route = plan_route(
        &request.start,
        &request.vias,
        &request.end,
        request.via_policy,
        geocoder,
        router,
    )?;

    let deliveries = store.deliveries_for_zone(&request.zone)?;
    if deliveries.is_empty() {
        log::warn!("No deliveries found for zone \"{}\"", request.zone.trim());
    }

    let classification = classify_deliveries(
        deliveries,
        &route.geometry.polyline,
        Some(route.end),
        request.buffer_m,
        geocoder,
    );
    let buffer_polygon = build_buffer(&route.geometry.polyline, request.buffer_m);

    Ok(RouteCheck {
        route,
        buffer_m: request.buffer_m,
        buffer_polygon,
        classification,
    })
}
