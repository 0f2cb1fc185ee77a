use super::types::{directions_body, parse_directions, parse_geocode};
use crate::sdk::geo::GeoPoint;
use crate::sdk::routing::error::RoutingError;
use crate::sdk::routing::route::RouteGeometry;
use crate::sdk::routing::service::{Geocoder, Router};
use crate::sdk::util::rate_limit::{wait_for_permit, Limiter};
use reqwest::blocking::Client;
use std::time::Duration;

pub const ORS_BASE_URL: &str = "https://api.openrouteservice.org";

/// Client for the hosted OpenRouteService API.
pub struct RemoteOrsProvider {
    client: Client,
    api_key: String,
    base_url: String,
    profile: String,
    limiter: Limiter,
}

impl RemoteOrsProvider {
    pub fn new(api_key: String, profile: String, limiter: Limiter) -> Result<Self, RoutingError> {
        Self::with_base_url(ORS_BASE_URL.to_string(), api_key, profile, limiter)
    }

    pub fn with_base_url(
        base_url: String,
        api_key: String,
        profile: String,
        limiter: Limiter,
    ) -> Result<Self, RoutingError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(15)).build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            profile,
            limiter,
        })
    }
}

impl Geocoder for RemoteOrsProvider {
    fn geocode(&self, address: &str) -> Result<GeoPoint, RoutingError> {
        wait_for_permit(&self.limiter);
        let url = format!("{}/geocode/search", self.base_url);
        log::debug!("[PROVIDER] Calling remote geocode for: \"{}\"", address);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("text", address)])
            .send()?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(RoutingError::from_api_body(status, text));
        }

        parse_geocode(address, &text).map_err(|e| {
            if let RoutingError::ParseError(why) = &e {
                log::error!(
                    "Failed to parse GeoResponse. URL: {}\nError: {}. Body: {}",
                    url,
                    why,
                    text
                );
            }
            e
        })
    }
}

impl Router for RemoteOrsProvider {
    fn route(&self, waypoints: &[GeoPoint]) -> Result<RouteGeometry, RoutingError> {
        if waypoints.len() < 2 {
            return Err(RoutingError::RouteUnavailable(format!(
                "at least 2 waypoints are required, got {}",
                waypoints.len()
            )));
        }

        wait_for_permit(&self.limiter);
        let url = format!("{}/v2/directions/{}/geojson", self.base_url, self.profile);
        let body = directions_body(waypoints);
        log::debug!(
            "[PROVIDER] Calling remote directions through {} waypoints",
            waypoints.len()
        );

        let response = match self
            .client
            .post(&url)
            .header("Authorization", &self.api_key)
            .json(&body)
            .send()
        {
            Ok(resp) => resp,
            Err(e) => {
                log::error!(
                    "Failed to send POST request. URL: {}\nBody: {}\nError: {}",
                    url,
                    serde_json::to_string_pretty(&body).unwrap_or_default(),
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
                    "Failed to parse DirectionsResponse. URL: {}\nError: {}. Body: {}",
                    url,
                    why,
                    text
                );
            }
            e
        })
    }
}
