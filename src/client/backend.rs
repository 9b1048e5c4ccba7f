// src/client/backend.rs
// DOCUMENTATION: HTTP calls the client makes for credentials and services
// PURPOSE: Token fetch, proxy POST and direct Azure search behind one type

use super::config::{ClientConfig, SearchMode};
use super::error::ClientError;
use crate::models::{
    Coordinate, MapCredential, MapsTokenResponse, NearbyServicesRequest, ServiceRecord,
};
use crate::services::{AzureMapsClient, AzureMapsError};
use reqwest::Client;
use serde_json::Value;

/// Issues the single network request of each cycle
pub struct ServicesSource {
    client: Client,
    mode: SearchMode,
    services_url: String,
    token_url: String,
    azure: AzureMapsClient,
}

impl ServicesSource {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            client: Client::new(),
            mode: config.search_mode,
            services_url: config.services_url(),
            token_url: config.token_url(),
            azure: AzureMapsClient::new()
                .with_base_url(config.azure_search_url.clone())
                .with_category_set(config.category_set.clone()),
        }
    }

    /// GET /api/maps-token
    pub async fn fetch_maps_token(&self) -> Result<String, ClientError> {
        log::debug!("Requesting maps token from {}", self.token_url);

        let response = self
            .client
            .get(&self.token_url)
            .send()
            .await
            .map_err(|e| ClientError::TokenUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::TokenUnavailable(format!(
                "status {}",
                response.status()
            )));
        }

        let body: MapsTokenResponse = response
            .json()
            .await
            .map_err(|e| ClientError::TokenUnavailable(format!("bad token payload: {}", e)))?;

        if body.token.trim().is_empty() {
            return Err(ClientError::TokenUnavailable("empty token".to_string()));
        }

        Ok(body.token)
    }

    /// Nearby services in whatever order the source returned them.
    /// An empty result is an error so every caller alerts the same way.
    pub async fn fetch(
        &self,
        credential: Option<&MapCredential>,
        center: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<ServiceRecord>, ClientError> {
        let services = match self.mode {
            SearchMode::Proxy => self.fetch_from_proxy(center, radius_m).await?,
            SearchMode::Direct => {
                let credential = credential.ok_or(ClientError::MissingCredential)?;
                self.azure
                    .search_nearby(credential, center, radius_m)
                    .await
                    .map_err(|e| Self::direct_error(e, radius_m))?
            }
        };

        if services.is_empty() {
            return Err(ClientError::EmptyResult {
                radius_m,
                detail: "empty result".to_string(),
            });
        }

        Ok(services)
    }

    async fn fetch_from_proxy(
        &self,
        center: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<ServiceRecord>, ClientError> {
        log::info!("Sending request to backend: {} (radius {} m)", center, radius_m);

        let response = self
            .client
            .post(&self.services_url)
            .json(&NearbyServicesRequest::new(center, radius_m))
            .send()
            .await
            .map_err(|e| ClientError::Connectivity(e.to_string()))?;

        let status = response.status();
        log::debug!("Response status: {}", status);
        if !status.is_success() {
            log::error!(
                "Failed to fetch services. Status: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            );
            return Err(ClientError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Connectivity(e.to_string()))?;

        Self::parse_services(&body, radius_m)
    }

    /// Accept only a JSON array of service records
    pub fn parse_services(body: &str, radius_m: u32) -> Result<Vec<ServiceRecord>, ClientError> {
        let empty = |detail: String| ClientError::EmptyResult { radius_m, detail };

        let value: Value =
            serde_json::from_str(body).map_err(|e| empty(format!("malformed JSON: {}", e)))?;

        match value {
            Value::Array(items) if items.is_empty() => Err(empty("empty array".to_string())),
            Value::Array(items) => serde_json::from_value(Value::Array(items))
                .map_err(|e| empty(format!("malformed service record: {}", e))),
            other => Err(empty(format!("expected array, got {}", type_name(&other)))),
        }
    }

    fn direct_error(e: AzureMapsError, radius_m: u32) -> ClientError {
        match e {
            AzureMapsError::Transport(e) => ClientError::Connectivity(e.to_string()),
            AzureMapsError::Status(code, _) => ClientError::Status(code),
            AzureMapsError::RateLimited => ClientError::Status(429),
            AzureMapsError::Parse(detail) => ClientError::EmptyResult { radius_m, detail },
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::error::ErrorKind;
    use httpmock::prelude::*;
    use serde_json::json;

    fn source(server: &MockServer, mode: SearchMode) -> ServicesSource {
        let config = ClientConfig {
            backend_url: server.base_url(),
            search_mode: mode,
            azure_search_url: server.url("/search/nearby/json"),
            ..ClientConfig::default()
        };
        ServicesSource::from_config(&config)
    }

    fn key() -> MapCredential {
        MapCredential::SubscriptionKey("k".to_string())
    }

    #[test]
    fn test_parse_services_shapes() {
        let kind = |body: &str| ServicesSource::parse_services(body, 5000).unwrap_err().kind();

        assert_eq!(kind("[]"), ErrorKind::NoServicesFound);
        assert_eq!(kind(r#"{"services": []}"#), ErrorKind::NoServicesFound);
        assert_eq!(kind("<html>"), ErrorKind::NoServicesFound);
        assert_eq!(kind(r#"[{"name": "x"}]"#), ErrorKind::NoServicesFound);

        let ok = ServicesSource::parse_services(
            r#"[{"name": "A", "type": "fire", "phone": "1", "address": "a", "distance": 5, "longitude": 1, "latitude": 2}]"#,
            5000,
        )
        .unwrap();
        assert_eq!(ok.len(), 1);
        assert_eq!(ok[0].distance, 5.0);
    }

    #[test]
    fn test_parse_services_keeps_records_with_null_text() {
        let services = ServicesSource::parse_services(
            r#"[{"name": null, "type": "hospital", "distance": 5, "longitude": 1, "latitude": 2},
                {"name": "Ok", "type": null, "distance": 6, "longitude": 1, "latitude": 2}]"#,
            5000,
        )
        .unwrap();

        assert_eq!(services.len(), 2);
        assert_eq!(services[0].name, "Unknown");
        assert_eq!(services[1].service_type, "Unknown");
    }

    #[tokio::test]
    async fn test_proxy_posts_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/services")
                    .json_body(json!({"latitude": 20.0, "longitude": 10.0, "radius": 5000}));
                then.status(200).json_body(json!([
                    {"name": "City Hospital", "type": "hospital", "phone": "555-1",
                     "distance": 4321, "longitude": 10, "latitude": 20, "address": "1 Main St"}
                ]));
            })
            .await;

        let services = source(&server, SearchMode::Proxy)
            .fetch(Some(&key()), Coordinate::new(20.0, 10.0), 5000)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(services[0].name, "City Hospital");
    }

    #[tokio::test]
    async fn test_proxy_status_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/services");
                then.status(502);
            })
            .await;

        let err = source(&server, SearchMode::Proxy)
            .fetch(Some(&key()), Coordinate::new(1.0, 2.0), 5000)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Status(502)));
    }

    #[tokio::test]
    async fn test_connectivity_error() {
        let config = ClientConfig {
            // Nothing listens on port 9 (discard) in the test environment
            backend_url: "http://127.0.0.1:9".to_string(),
            ..ClientConfig::default()
        };
        let err = ServicesSource::from_config(&config)
            .fetch(Some(&key()), Coordinate::new(1.0, 2.0), 5000)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connectivity);
    }

    #[tokio::test]
    async fn test_direct_mode_uses_azure() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search/nearby/json")
                    .query_param("subscription-key", "k");
                then.status(200).json_body(json!({"results": []}));
            })
            .await;

        let err = source(&server, SearchMode::Direct)
            .fetch(Some(&key()), Coordinate::new(1.0, 2.0), 2000)
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.kind(), ErrorKind::NoServicesFound);
    }

    #[tokio::test]
    async fn test_fetch_maps_token() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/maps-token");
                then.status(200).json_body(json!({"token": "abc"}));
            })
            .await;

        let token = source(&server, SearchMode::Proxy)
            .fetch_maps_token()
            .await
            .unwrap();
        assert_eq!(token, "abc");
    }

    #[tokio::test]
    async fn test_fetch_maps_token_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/maps-token");
                then.status(503);
            })
            .await;

        let err = source(&server, SearchMode::Proxy)
            .fetch_maps_token()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TokenUnavailable);
    }
}
