use std::env;
use thiserror::Error;

use super::routing::error::RoutingError;
use super::routing::provider::{HybridOrsProvider, LocalOrsProvider, RemoteOrsProvider};
use super::routing::service::RoutingProvider;
use super::util::rate_limit::{ors_limiter, ORS_REQUESTS_PER_MINUTE};

pub const DEFAULT_PROFILE: &str = "driving-car";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} has an invalid value \"{value}\"")]
    Invalid { name: &'static str, value: String },

    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] RoutingError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrsBackend {
    Remote { api_key: String },
    Local { base_url: String },
    Hybrid { api_key: String, base_url: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrsConfig {
    pub backend: OrsBackend,
    pub profile: String,
    pub requests_per_minute: u32,
}

impl OrsConfig {
    /// Reads `ORS_MODE`, `ORS_API_KEY` (or `OPENROUTE_SERVICE_API_KEY`),
    /// `ORS_LOCAL_URL`, `ORS_PROFILE` and `ORS_RATE_PER_MINUTE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let api_key = || {
            get("ORS_API_KEY")
                .or_else(|| get("OPENROUTE_SERVICE_API_KEY"))
                .ok_or(ConfigError::Missing("ORS_API_KEY"))
        };
        let base_url = || get("ORS_LOCAL_URL").ok_or(ConfigError::Missing("ORS_LOCAL_URL"));

        let mode = get("ORS_MODE").unwrap_or_else(|| "remote".to_string());
        let backend = match mode.trim().to_lowercase().as_str() {
            "remote" => OrsBackend::Remote { api_key: api_key()? },
            "local" => OrsBackend::Local {
                base_url: base_url()?,
            },
            "hybrid" => OrsBackend::Hybrid {
                api_key: api_key()?,
                base_url: base_url()?,
            },
            _ => {
                return Err(ConfigError::Invalid {
                    name: "ORS_MODE",
                    value: mode,
                })
            }
        };

        let requests_per_minute = match get("ORS_RATE_PER_MINUTE") {
            None => ORS_REQUESTS_PER_MINUTE,
            Some(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|rate| *rate > 0)
                .ok_or(ConfigError::Invalid {
                    name: "ORS_RATE_PER_MINUTE",
                    value,
                })?,
        };

        Ok(Self {
            backend,
            profile: get("ORS_PROFILE").unwrap_or_else(|| DEFAULT_PROFILE.to_string()),
            requests_per_minute,
        })
    }

    pub fn build_provider(&self) -> Result<Box<dyn RoutingProvider>, ConfigError> {
        let profile = self.profile.clone();
        let provider: Box<dyn RoutingProvider> = match &self.backend {
            OrsBackend::Remote { api_key } => Box::new(RemoteOrsProvider::new(
                api_key.clone(),
                profile,
                ors_limiter(self.requests_per_minute),
            )?),
            OrsBackend::Local { base_url } => {
                Box::new(LocalOrsProvider::new(base_url.clone(), profile)?)
            }
            OrsBackend::Hybrid { api_key, base_url } => Box::new(HybridOrsProvider::new(
                RemoteOrsProvider::new(
                    api_key.clone(),
                    profile.clone(),
                    ors_limiter(self.requests_per_minute),
                )?,
                LocalOrsProvider::new(base_url.clone(), profile)?,
            )),
        };
        Ok(provider)
    }
}
