use serde::Deserialize;
use thiserror::Error;

// Helper structs to parse the JSON error response from ORS
#[derive(Deserialize, Debug)]
pub struct OrsErrorDetail {
    pub code: u32,
    pub message: String,
}
#[derive(Deserialize, Debug)]
pub struct OrsErrorPayload {
    pub error: OrsErrorDetail,
}

#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("Location not found: \"{0}\"")]
    GeocodeNotFound(String),

    #[error("No route available: {0}")]
    RouteUnavailable(String),

    // Structured error body returned by ORS
    #[error("API Error (Code {code}): {message}")]
    ApiError { code: u32, message: String },

    // A fallback for when we get an error that isn't in the expected JSON format
    #[error("Unstructured API Error: {0}")]
    RawApiError(String),

    #[error("Underlying request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl RoutingError {
    /// True when the provider answered but had nothing for the query.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::GeocodeNotFound(_) | Self::RouteUnavailable(_))
    }

    /// Maps a non-success ORS body to the structured or raw API error.
    pub fn from_api_body(status: reqwest::StatusCode, body: String) -> Self {
        match serde_json::from_str::<OrsErrorPayload>(&body) {
            Ok(payload) => Self::ApiError {
                code: payload.error.code,
                message: payload.error.message,
            },
            Err(_) => {
                log::error!(
                    "API returned non-success status: {}. Unparseable Body: {}",
                    status,
                    body
                );
                Self::RawApiError(body)
            }
        }
    }
}
