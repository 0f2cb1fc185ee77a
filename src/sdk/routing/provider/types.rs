use serde::Deserialize;
use serde_json::json;

use crate::sdk::geo::{GeoPoint, Polyline};
use crate::sdk::routing::error::RoutingError;
use crate::sdk::routing::route::{RouteGeometry, RouteSummary};

// --- Data Structures for parsing ORS responses ---

#[derive(Deserialize)]
pub struct GeoResponse {
    pub features: Vec<GeoFeature>,
}
#[derive(Deserialize)]
pub struct GeoFeature {
    pub geometry: PointGeometry,
    #[serde(default)]
    pub properties: GeoProperties,
}
#[derive(Deserialize)]
pub struct PointGeometry {
    pub coordinates: [f64; 2],
}
#[derive(Deserialize, Default)]
pub struct GeoProperties {
    pub label: Option<String>,
    pub confidence: Option<f64>,
}

#[derive(Deserialize)]
pub struct DirectionsResponse {
    pub features: Vec<RouteFeature>,
}
#[derive(Deserialize)]
pub struct RouteFeature {
    pub geometry: LineGeometry,
    #[serde(default)]
    pub properties: RouteProperties,
}
#[derive(Deserialize)]
pub struct LineGeometry {
    pub coordinates: Vec<[f64; 2]>,
}
#[derive(Deserialize, Default)]
pub struct RouteProperties {
    pub summary: Option<DirectionsSummary>,
    #[serde(default)]
    pub segments: Vec<DirectionsSummary>,
}
#[derive(Deserialize, Clone, Copy, Default)]
pub struct DirectionsSummary {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

/// Request body for `/v2/directions/{profile}/geojson`.
pub fn directions_body(waypoints: &[GeoPoint]) -> serde_json::Value {
    let coordinates: Vec<[f64; 2]> = waypoints.iter().map(|point| point.to_lon_lat()).collect();
    json!({
        "coordinates": coordinates,
        "instructions": false,
        "preference": "recommended",
    })
}

/// Picks the first geocoding feature and flips it to latitude-first.
pub fn parse_geocode(address: &str, body: &str) -> Result<GeoPoint, RoutingError> {
    let response: GeoResponse = serde_json::from_str(body)?;
    let feature = response
        .features
        .into_iter()
        .next()
        .ok_or_else(|| RoutingError::GeocodeNotFound(address.to_string()))?;

    log::debug!(
        "Geocoded \"{}\" as {:?} (confidence {:?})",
        address,
        feature.properties.label,
        feature.properties.confidence
    );
    Ok(GeoPoint::from_lon_lat(feature.geometry.coordinates))
}

/// Extracts the first route of a GeoJSON directions response.
pub fn parse_directions(body: &str) -> Result<RouteGeometry, RoutingError> {
    let response: DirectionsResponse = serde_json::from_str(body)?;
    let feature = response
        .features
        .into_iter()
        .next()
        .ok_or_else(|| RoutingError::RouteUnavailable("No route found in response".to_string()))?;

    let totals = feature.properties.summary.unwrap_or_else(|| {
        feature
            .properties
            .segments
            .iter()
            .fold(DirectionsSummary::default(), |acc, segment| DirectionsSummary {
                distance: acc.distance + segment.distance,
                duration: acc.duration + segment.duration,
            })
    });

    Ok(RouteGeometry {
        polyline: Polyline::from_lon_lat(&feature.geometry.coordinates),
        summary: RouteSummary::from_meters_seconds(totals.distance, totals.duration),
    })
}
