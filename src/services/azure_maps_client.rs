// src/services/azure_maps_client.rs
// DOCUMENTATION: Azure Maps "search nearby" API client
// PURPOSE: Query nearby emergency POIs and map them into service records

use crate::models::{Coordinate, MapCredential, ServiceRecord};
use governor::DefaultDirectRateLimiter;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

/// Default Azure Maps search nearby endpoint
pub const AZURE_SEARCH_URL: &str = "https://atlas.microsoft.com/search/nearby/json";

/// Hospitals, police stations, fire stations
pub const DEFAULT_CATEGORY_SET: &str = "7321,7322,7392";

/// Failure talking to Azure Maps
/// DOCUMENTATION: Kept separate from ServicesError so the client orchestrator
/// can tell a dead network apart from an upstream rejection.
#[derive(Error, Debug)]
pub enum AzureMapsError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error {0}: {1}")]
    Status(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Upstream rate limit reached")]
    RateLimited,
}

/// Response from Azure Maps search nearby
#[derive(Debug, Deserialize)]
pub struct AzureSearchResponse {
    #[serde(default)]
    pub results: Vec<AzureSearchResult>,
}

/// Individual result of a nearby search
#[derive(Debug, Clone, Deserialize)]
pub struct AzureSearchResult {
    pub position: Option<AzurePosition>,
    pub poi: Option<AzurePoi>,
    pub address: Option<AzureAddress>,
    /// Distance from the query point in meters
    pub dist: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AzurePosition {
    pub lat: f64,
    pub lon: f64,
}

/// Point of interest metadata
#[derive(Debug, Clone, Deserialize)]
pub struct AzurePoi {
    pub name: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "categorySet", default)]
    pub category_set: Vec<AzureCategoryId>,
    /// Lower-case category names, e.g. "hospital/polyclinic"
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AzureCategoryId {
    pub id: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AzureAddress {
    #[serde(rename = "freeformAddress")]
    pub freeform_address: Option<String>,
}

/// Azure Maps search client
/// DOCUMENTATION: One reqwest connection pool shared by every search.
/// The credential is supplied per call: the proxy passes its subscription key,
/// the client orchestrator passes whatever its session resolved.
#[derive(Clone)]
pub struct AzureMapsClient {
    client: Client,
    base_url: String,
    category_set: String,
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl AzureMapsClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: AZURE_SEARCH_URL.to_string(),
            category_set: DEFAULT_CATEGORY_SET.to_string(),
            limiter: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_category_set(mut self, category_set: impl Into<String>) -> Self {
        self.category_set = category_set.into();
        self
    }

    /// Gate every upstream call through a shared rate limiter
    pub fn with_rate_limiter(mut self, limiter: Arc<DefaultDirectRateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Perform nearby search for emergency services
    ///
    /// # Arguments
    /// * `credential` - Subscription key or bearer token
    /// * `center` - Search center
    /// * `radius` - Search radius in meters
    ///
    /// # Returns
    /// Service records in upstream order; results without a position are dropped
    pub async fn search_nearby(
        &self,
        credential: &MapCredential,
        center: Coordinate,
        radius: u32,
    ) -> Result<Vec<ServiceRecord>, AzureMapsError> {
        if let Some(limiter) = &self.limiter {
            if limiter.check().is_err() {
                log::warn!("Azure Maps rate limit reached, rejecting search");
                return Err(AzureMapsError::RateLimited);
            }
        }

        log::debug!(
            "Azure Maps nearby search: lat={}, lon={}, radius={}",
            center.latitude,
            center.longitude,
            radius
        );

        let request = self.client.get(&self.base_url).query(&[
            ("api-version", "1.0".to_string()),
            ("lat", center.latitude.to_string()),
            ("lon", center.longitude.to_string()),
            ("radius", radius.to_string()),
            ("categorySet", self.category_set.clone()),
        ]);

        let response = credential.apply(request).send().await.map_err(|e| {
            log::error!("Azure Maps request failed: {}", e);
            AzureMapsError::Transport(e)
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Azure Maps API error {}: {}", status, body);
            return Err(AzureMapsError::Status(status.as_u16(), body));
        }

        let body = response.text().await?;
        let api_response: AzureSearchResponse = serde_json::from_str(&body).map_err(|e| {
            log::error!("Failed to parse Azure Maps response: {}", e);
            AzureMapsError::Parse(e.to_string())
        })?;

        let services: Vec<ServiceRecord> = api_response
            .results
            .iter()
            .filter_map(|result| Self::to_service_record(result, center))
            .collect();

        log::info!(
            "Azure Maps search returned {} results ({} usable)",
            api_response.results.len(),
            services.len()
        );

        Ok(services)
    }

    /// Convert one search result into a service record
    /// DOCUMENTATION: Name defaults to "Unknown"; type comes from the first
    /// category name, then the first category id; distance falls back to the
    /// great-circle distance from `center` when the API omits `dist`.
    pub fn to_service_record(
        result: &AzureSearchResult,
        center: Coordinate,
    ) -> Option<ServiceRecord> {
        let position = result.position.as_ref()?;
        let position = Coordinate::new(position.lat, position.lon);
        let poi = result.poi.as_ref();

        let name = poi
            .and_then(|p| p.name.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        let service_type = poi
            .and_then(|p| {
                p.categories.first().cloned().or_else(|| {
                    p.category_set
                        .first()
                        .and_then(|c| Self::category_name(c.id))
                        .map(str::to_string)
                })
            })
            .unwrap_or_else(|| "Unknown".to_string());

        Some(ServiceRecord {
            name,
            service_type,
            phone: poi.and_then(|p| p.phone.clone()).unwrap_or_default(),
            address: result
                .address
                .as_ref()
                .and_then(|a| a.freeform_address.clone())
                .unwrap_or_default(),
            distance: result.dist.unwrap_or_else(|| center.distance_to(&position)),
            longitude: position.longitude,
            latitude: position.latitude,
        })
    }

    /// Map Azure category ids to a display type
    fn category_name(id: u32) -> Option<&'static str> {
        match id {
            7321 => Some("hospital"),
            7322 => Some("police station"),
            7392 => Some("fire station"),
            _ => None,
        }
    }
}

impl Default for AzureMapsClient {
    fn default() -> Self {
        Self::new()
    }
}
