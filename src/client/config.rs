// src/client/config.rs
// DOCUMENTATION: Client orchestrator configuration
// PURPOSE: One configuration-driven flow instead of per-variant scripts

use crate::models::{Coordinate, DEFAULT_RADIUS_M};
use crate::services::{AZURE_SEARCH_URL, DEFAULT_CATEGORY_SET};
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Where the map credential comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Subscription key baked into configuration
    StaticKey(String),
    /// Bearer token from GET {backend}/api/maps-token
    BackendToken,
}

/// How the user's position is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationMode {
    OneShot,
    Continuous,
    /// Use the saved location if present, otherwise ask geolocation
    CachedThenLive,
}

impl FromStr for LocationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "one-shot" | "oneshot" | "once" => Ok(LocationMode::OneShot),
            "continuous" | "watch" => Ok(LocationMode::Continuous),
            "cached-then-live" | "cached" => Ok(LocationMode::CachedThenLive),
            other => Err(format!("unknown location mode: {}", other)),
        }
    }
}

/// Where nearby services are fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Azure Maps search nearby, called from the client
    Direct,
    /// POST to the backend proxy
    Proxy,
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "direct" => Ok(SearchMode::Direct),
            "proxy" | "backend" => Ok(SearchMode::Proxy),
            other => Err(format!("unknown search mode: {}", other)),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credential_source: CredentialSource,
    pub location_mode: LocationMode,
    pub search_mode: SearchMode,

    /// Backend base URL, e.g. "http://127.0.0.1:5000"
    pub backend_url: String,

    /// "/services" or "/api/services"
    pub services_path: String,

    pub azure_search_url: String,
    pub category_set: String,

    /// Search radius in meters
    pub radius_m: u32,

    /// Upper bound on a single geolocation request
    pub location_timeout: Duration,

    /// Substituted when geolocation fails; None means alert and stop
    pub fallback: Option<Coordinate>,

    /// File holding the last known location
    pub saved_location_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credential_source: CredentialSource::BackendToken,
            location_mode: LocationMode::OneShot,
            search_mode: SearchMode::Proxy,
            backend_url: "http://127.0.0.1:5000".to_string(),
            services_path: "/services".to_string(),
            azure_search_url: AZURE_SEARCH_URL.to_string(),
            category_set: DEFAULT_CATEGORY_SET.to_string(),
            radius_m: DEFAULT_RADIUS_M,
            location_timeout: Duration::from_secs(10),
            fallback: None,
            saved_location_path: None,
        }
    }
}

impl ClientConfig {
    /// Load client configuration from environment variables
    /// DOCUMENTATION: Unset or unparsable values keep their defaults.
    /// CREDENTIAL_SOURCE is "backend-token" or "static-key" (uses AZURE_MAPS_KEY).
    pub fn from_env() -> Self {
        dotenv().ok();
        let defaults = Self::default();

        let credential_source = match env::var("CREDENTIAL_SOURCE").as_deref() {
            Ok("static-key") => {
                CredentialSource::StaticKey(env::var("AZURE_MAPS_KEY").unwrap_or_default())
            }
            _ => CredentialSource::BackendToken,
        };

        let fallback = match (env::var("FALLBACK_LAT"), env::var("FALLBACK_LON")) {
            (Ok(lat), Ok(lon)) => match (lat.parse(), lon.parse()) {
                (Ok(lat), Ok(lon)) => Some(Coordinate::new(lat, lon)),
                _ => {
                    log::warn!("Ignoring unparsable FALLBACK_LAT/FALLBACK_LON");
                    None
                }
            },
            _ => None,
        };

        Self {
            credential_source,
            location_mode: env::var("LOCATION_MODE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.location_mode),
            search_mode: env::var("SEARCH_MODE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.search_mode),
            backend_url: env::var("BACKEND_URL").unwrap_or(defaults.backend_url),
            services_path: env::var("SERVICES_PATH").unwrap_or(defaults.services_path),
            azure_search_url: env::var("AZURE_SEARCH_URL").unwrap_or(defaults.azure_search_url),
            category_set: env::var("SEARCH_CATEGORY_SET").unwrap_or(defaults.category_set),
            radius_m: env::var("SEARCH_RADIUS_M")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.radius_m),
            location_timeout: env::var("LOCATION_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.location_timeout),
            fallback,
            saved_location_path: env::var("SAVED_LOCATION_PATH").ok().map(PathBuf::from),
        }
    }

    /// Full URL of the proxy services route
    pub fn services_url(&self) -> String {
        join_url(&self.backend_url, &self.services_path)
    }

    pub fn token_url(&self) -> String {
        join_url(&self.backend_url, "/api/maps-token")
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("continuous".parse::<LocationMode>(), Ok(LocationMode::Continuous));
        assert_eq!("Cached-Then-Live".parse::<LocationMode>(), Ok(LocationMode::CachedThenLive));
        assert!("sometimes".parse::<LocationMode>().is_err());

        assert_eq!("proxy".parse::<SearchMode>(), Ok(SearchMode::Proxy));
        assert_eq!("direct".parse::<SearchMode>(), Ok(SearchMode::Direct));
    }

    #[test]
    fn test_urls() {
        let config = ClientConfig {
            backend_url: "http://localhost:5000/".to_string(),
            services_path: "/api/services".to_string(),
            ..ClientConfig::default()
        };

        assert_eq!(config.services_url(), "http://localhost:5000/api/services");
        assert_eq!(config.token_url(), "http://localhost:5000/api/maps-token");
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.radius_m, 5000);
        assert_eq!(config.location_timeout, Duration::from_secs(10));
        assert!(config.fallback.is_none());
    }
}
