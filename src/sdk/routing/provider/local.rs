use super::types::{directions_body, parse_directions, parse_geocode};
use crate::sdk::geo::GeoPoint;
use crate::sdk::routing::error::RoutingError;
use crate::sdk::routing::route::RouteGeometry;
use crate::sdk::routing::service::{Geocoder, Router};
use reqwest::blocking::Client;
use std::time::Duration;

/// Client for a self-hosted ORS instance with a Pelias geocoder. No API key
/// and no rate limit.
pub struct LocalOrsProvider {
    client: Client,
    base_url: String,
    profile: String,
}

impl LocalOrsProvider {
    pub fn new(base_url: String, profile: String) -> Result<Self, RoutingError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(15)).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            profile,
        })
    }
}

impl Geocoder for LocalOrsProvider {
    fn geocode(&self, address: &str) -> Result<GeoPoint, RoutingError> {
        log::debug!("[PROVIDER] Calling local geocode for: \"{}\"", address);
        let url = format!("{}/pelias/v1/search", self.base_url);

        let response = self.client.get(&url).query(&[("text", address)]).send()?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(RoutingError::from_api_body(status, text));
        }

        parse_geocode(address, &text).map_err(|e| {
            if let RoutingError::ParseError(why) = &e {
                log::error!(
                    "Failed to parse local GeoResponse. URL: {}\nError: {}. Body: {}",
                    url,
                    why,
                    text
                );
            }
            e
        })
    }
}

impl Router for LocalOrsProvider {
    fn route(&self, waypoints: &[GeoPoint]) -> Result<RouteGeometry, RoutingError> {
        if waypoints.len() < 2 {
            return Err(RoutingError::RouteUnavailable(format!(
                "at least 2 waypoints are required, got {}",
                waypoints.len()
            )));
        }

        log::debug!(
            "[PROVIDER] Calling local directions through {} waypoints",
            waypoints.len()
        );
        let url = format!("{}/v2/directions/{}/geojson", self.base_url, self.profile);
        let body = directions_body(waypoints);

        let response = match self.client.post(&url).json(&body).send() {
            Ok(resp) => resp,
            Err(e) => {
                log::error!(
                    "Failed to send POST request to local ORS. URL: {}\nError: {}",
                    url,
                    e
                );
                return Err(e.into());
            }
        };

        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(RoutingError::from_api_body(status, text));
        }

        parse_directions(&text).map_err(|e| {
            if let RoutingError::ParseError(why) = &e {
                log::error!(
                    "Failed to parse local DirectionsResponse. URL: {}\nError: {}. Body: {}",
                    url,
                    why,
                    text
                );
            }
            e
        })
    }
}
