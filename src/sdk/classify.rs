//! Splits a zone's deliveries into those inside and outside the route buffer.

use serde::{Serialize, Serializer};

use super::deliveries::Delivery;
use super::geo::{distance_to_route, haversine_distance, GeoPoint, Polyline};
use super::routing::{geocode::resolve_location, service::Geocoder};

#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedDelivery {
    #[serde(flatten)]
    pub delivery: Delivery,
    pub drop_coords: Option<GeoPoint>,
    #[serde(serialize_with = "finite_or_null")]
    pub distance_to_route_m: f64,
    pub in_buffer: bool,
}

impl ClassifiedDelivery {
    fn unresolved(delivery: Delivery) -> Self {
        Self {
            delivery,
            drop_coords: None,
            distance_to_route_m: f64::INFINITY,
            in_buffer: false,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.drop_coords.is_some()
    }
}

fn finite_or_null<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationCounts {
    pub total: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub in_buffer: usize,
    /// Everything not in the buffer, unresolved deliveries included.
    pub out_of_buffer: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Classification {
    pub deliveries: Vec<ClassifiedDelivery>,
    pub counts: ClassificationCounts,
}

/// Distance from a resolved drop point to the route. Without route geometry
/// the straight-line distance to `fallback_end` is used instead.
pub fn distance_from_route(point: GeoPoint, route: &Polyline, fallback_end: Option<GeoPoint>) -> f64 {
    match (route.is_empty(), fallback_end) {
        (true, Some(end)) => haversine_distance(point, end),
        _ => distance_to_route(point, route),
    }
}

/// Resolves and measures every delivery, then sorts them by distance to the
/// route (stable, unresolved last). A failing drop point only affects its own
/// delivery.
pub fn classify_deliveries<G>(
    deliveries: Vec<Delivery>,
    route: &Polyline,
    fallback_end: Option<GeoPoint>,
    width_m: f64,
    geocoder: &G,
) -> Classification
where
    G: Geocoder + ?Sized,
{
    let mut classified: Vec<ClassifiedDelivery> = deliveries
        .into_iter()
        .map(|delivery| {
            let Some(drop_point) = delivery.drop_point() else {
                log::debug!("Delivery {} has no drop point", delivery.id);
                return ClassifiedDelivery::unresolved(delivery);
            };

            let coords = match resolve_location(drop_point, geocoder) {
                Ok(coords) => coords,
                Err(why) if why.is_not_found() => {
                    log::warn!(
                        "Could not geocode drop point of delivery {} (\"{}\"): {}",
                        delivery.id,
                        drop_point,
                        why
                    );
                    return ClassifiedDelivery::unresolved(delivery);
                }
                Err(why) => {
                    log::error!(
                        "Geocoder failed for delivery {} (\"{}\"): {}",
                        delivery.id,
                        drop_point,
                        why
                    );
                    return ClassifiedDelivery::unresolved(delivery);
                }
            };

            let distance = distance_from_route(coords, route, fallback_end);
            let in_buffer = distance.is_finite() && distance <= width_m;
            log::debug!(
                "Delivery {}: distance={:.2}m, buffer={}m, inBuffer={}",
                delivery.id,
                distance,
                width_m,
                in_buffer
            );

            ClassifiedDelivery {
                delivery,
                drop_coords: Some(coords),
                distance_to_route_m: distance,
                in_buffer,
            }
        })
        .collect();

    classified.sort_by(|a, b| a.distance_to_route_m.total_cmp(&b.distance_to_route_m));

    let counts = count(&classified);
    log::info!(
        "Found {} deliveries: {} inside buffer, {} outside buffer ({} unresolved)",
        counts.total,
        counts.in_buffer,
        counts.out_of_buffer,
        counts.unresolved
    );

    Classification {
        deliveries: classified,
        counts,
    }
}

fn count(classified: &[ClassifiedDelivery]) -> ClassificationCounts {
    let total = classified.len();
    let resolved = classified.iter().filter(|d| d.is_resolved()).count();
    let in_buffer = classified.iter().filter(|d| d.in_buffer).count();
    ClassificationCounts {
        total,
        resolved,
        unresolved: total - resolved,
        in_buffer,
        out_of_buffer: total - in_buffer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::routing::error::RoutingError;

    fn delivery(id: &str, drop_point: &str) -> Delivery {
        Delivery {
            id: id.to_string(),
            drop_point: Some(drop_point.to_string()),
            ..Default::default()
        }
    }

    fn no_geocoder(address: &str) -> Result<GeoPoint, RoutingError> {
        Err(RoutingError::GeocodeNotFound(address.to_string()))
    }

    fn route() -> Polyline {
        Polyline::new(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)])
    }

    #[test]
    fn empty_input_gives_empty_result() {
        let result = classify_deliveries(Vec::new(), &route(), None, 1000.0, &no_geocoder);
        assert!(result.deliveries.is_empty());
        assert_eq!(result.counts, ClassificationCounts::default());
    }

    #[test]
    fn nearby_drop_point_is_in_buffer() {
        let result = classify_deliveries(
            vec![delivery("a", "0.0001,0.5")],
            &route(),
            None,
            1000.0,
            &no_geocoder,
        );
        let only = &result.deliveries[0];
        assert!(only.in_buffer);
        let expected = haversine_distance(GeoPoint::new(0.0001, 0.5), GeoPoint::new(0.0, 0.5));
        assert!((only.distance_to_route_m - expected).abs() / expected < 0.01);
    }

    #[test]
    fn boundary_distance_is_inside() {
        let point = GeoPoint::new(0.0, 2.0);
        let width = haversine_distance(point, GeoPoint::new(0.0, 1.0));
        let result = classify_deliveries(
            vec![delivery("edge", "0.0,2.0")],
            &route(),
            None,
            width,
            &no_geocoder,
        );
        assert!(result.deliveries[0].in_buffer);
    }

    #[test]
    fn unresolved_deliveries_sort_last() {
        let result = classify_deliveries(
            vec![
                delivery("missing", "nowhere at all"),
                delivery("far", "0.5,0.5"),
                Delivery {
                    id: "blank".into(),
                    drop_point: Some("   ".into()),
                    ..Default::default()
                },
                delivery("near", "0.001,0.5"),
            ],
            &route(),
            None,
            1000.0,
            &no_geocoder,
        );

        let ids: Vec<_> = result.deliveries.iter().map(|d| d.delivery.id.as_str()).collect();
        assert_eq!(ids, ["near", "far", "missing", "blank"]);

        let missing = &result.deliveries[2];
        assert!(missing.distance_to_route_m.is_infinite());
        assert!(!missing.in_buffer);
        assert!(missing.drop_coords.is_none());

        assert_eq!(
            result.counts,
            ClassificationCounts {
                total: 4,
                resolved: 2,
                unresolved: 2,
                in_buffer: 1,
                out_of_buffer: 3,
            }
        );
    }

    #[test]
    fn address_drop_points_use_the_geocoder() {
        let geocoder = |address: &str| -> Result<GeoPoint, RoutingError> {
            match address {
                "Depot" => Ok(GeoPoint::new(0.0, 0.5)),
                other => Err(RoutingError::GeocodeNotFound(other.to_string())),
            }
        };
        let result =
            classify_deliveries(vec![delivery("d", " Depot ")], &route(), None, 10.0, &geocoder);
        assert_eq!(result.deliveries[0].drop_coords, Some(GeoPoint::new(0.0, 0.5)));
        assert_eq!(result.deliveries[0].distance_to_route_m, 0.0);
    }

    #[test]
    fn empty_route_falls_back_to_end_location() {
        let end = GeoPoint::new(10.0, 10.0);
        let drop = GeoPoint::new(10.0, 10.01);
        let result = classify_deliveries(
            vec![delivery("x", "10.0,10.01")],
            &Polyline::default(),
            Some(end),
            5000.0,
            &no_geocoder,
        );
        assert_eq!(result.deliveries[0].distance_to_route_m, haversine_distance(drop, end));
        assert!(result.deliveries[0].in_buffer);

        let without_end = classify_deliveries(
            vec![delivery("x", "10.0,10.01")],
            &Polyline::default(),
            None,
            5000.0,
            &no_geocoder,
        );
        assert!(without_end.deliveries[0].distance_to_route_m.is_infinite());
    }

    #[test]
    fn unmeasurable_distance_is_never_inside() {
        let result = classify_deliveries(
            vec![delivery("x", "10.0,10.01")],
            &Polyline::default(),
            None,
            f64::INFINITY,
            &no_geocoder,
        );
        let only = &result.deliveries[0];
        assert!(only.distance_to_route_m.is_infinite());
        assert!(!only.in_buffer);
        assert_eq!(result.counts.in_buffer, 0);
        assert_eq!(result.counts.out_of_buffer, 1);
    }

    #[test]
    fn provider_failure_only_unresolves_that_delivery() {
        let geocoder = |address: &str| -> Result<GeoPoint, RoutingError> {
            Err(RoutingError::ApiError {
                code: 403,
                message: format!("quota exceeded for {address}"),
            })
        };
        let result = classify_deliveries(
            vec![delivery("addr", "Depot"), delivery("lit", "0.0,0.5")],
            &route(),
            None,
            10.0,
            &geocoder,
        );
        let ids: Vec<_> = result.deliveries.iter().map(|d| d.delivery.id.as_str()).collect();
        assert_eq!(ids, ["lit", "addr"]);
        assert_eq!(result.counts.unresolved, 1);
        assert!(result.deliveries[0].in_buffer);
    }

    #[test]
    fn route_geometry_wins_over_fallback_end() {
        let far_end = GeoPoint::new(50.0, 50.0);
        let result = classify_deliveries(
            vec![delivery("a", "0.0,0.5")],
            &route(),
            Some(far_end),
            1.0,
            &no_geocoder,
        );
        assert_eq!(result.deliveries[0].distance_to_route_m, 0.0);
    }

    #[test]
    fn infinite_distance_serialises_as_null() {
        let result = classify_deliveries(
            vec![delivery("lost", "nowhere")],
            &route(),
            None,
            1000.0,
            &no_geocoder,
        );
        let json = serde_json::to_value(&result.deliveries[0]).unwrap();
        assert!(json["distance_to_route_m"].is_null());
        assert_eq!(json["id"], "lost");
        assert_eq!(json["in_buffer"], false);
    }
}
