// src/models/service.rs
// DOCUMENTATION: Emergency service records and request/response DTOs
// PURPOSE: Wire formats shared by the proxy routes and the client orchestrator

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::Coordinate;

/// Default search radius in meters (5 km)
pub const DEFAULT_RADIUS_M: u32 = 5000;

/// Largest radius the search API accepts
pub const MAX_RADIUS_M: u32 = 50_000;

fn unknown() -> String {
    "Unknown".to_string()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown))
}

/// One emergency service near the user
/// DOCUMENTATION: Element of the JSON array returned by POST /services.
/// `distance` is meters from the search center. Text fields tolerate
/// missing or null values; position and distance are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// Display name
    #[serde(default = "unknown", deserialize_with = "null_as_unknown")]
    pub name: String,

    /// Service category: hospital, police, fire station, ...
    #[serde(rename = "type", default = "unknown", deserialize_with = "null_as_unknown")]
    pub service_type: String,

    /// Contact phone number
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,

    /// Street address
    #[serde(default, deserialize_with = "null_as_empty")]
    pub address: String,

    /// Distance from the search center in meters
    pub distance: f64,

    pub longitude: f64,
    pub latitude: f64,
}

impl ServiceRecord {
    pub fn position(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Sort services ascending by distance
/// DOCUMENTATION: Stable, so equal distances keep their input order.
/// NaN distances sort after every number.
pub fn sort_by_distance(services: &mut [ServiceRecord]) {
    services.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

/// Meters to kilometers rounded to two decimals
pub fn distance_km(meters: f64) -> f64 {
    (meters / 1000.0 * 100.0).round() / 100.0
}

/// Request body for POST /services
/// DOCUMENTATION: Sent by the client in proxy mode
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearbyServicesRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    /// Search radius in meters (default 5000)
    #[serde(default)]
    #[validate(range(min = 1, max = 50000))]
    pub radius: Option<u32>,
}

impl NearbyServicesRequest {
    pub fn new(center: Coordinate, radius: u32) -> Self {
        Self {
            latitude: center.latitude,
            longitude: center.longitude,
            radius: Some(radius),
        }
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn radius_or_default(&self) -> u32 {
        self.radius.unwrap_or(DEFAULT_RADIUS_M)
    }
}

/// Query string for GET /services
#[derive(Debug, Deserialize)]
pub struct NearbyServicesQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius: Option<u32>,
    /// "json" (default) or "geojson"
    pub format: Option<String>,
}

/// Response for GET /services
#[derive(Debug, Serialize, Deserialize)]
pub struct ServicesResponse {
    pub services: Vec<ServiceRecord>,
    pub count: usize,
}

impl From<Vec<ServiceRecord>> for ServicesResponse {
    fn from(services: Vec<ServiceRecord>) -> Self {
        let count = services.len();
        Self { services, count }
    }
}

/// Response for GET /api/maps-token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapsTokenResponse {
    pub token: String,
}
