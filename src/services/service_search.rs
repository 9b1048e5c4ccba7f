// src/services/service_search.rs
// DOCUMENTATION: Business logic for nearby service lookups
// PURPOSE: Intermediary between handlers and the Azure Maps client

use crate::errors::ServicesError;
use crate::models::{sort_by_distance, Coordinate, MapCredential, ServiceRecord, MAX_RADIUS_M};
use crate::services::{AzureMapsClient, ServicesCache};
use geo_types::Point;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use std::sync::Arc;

/// Nearby search with caching
/// DOCUMENTATION: Shared by every worker through `web::Data`
pub struct ServiceSearch {
    client: AzureMapsClient,
    credential: Option<MapCredential>,
    cache: Arc<ServicesCache>,
}

impl ServiceSearch {
    /// `credential` is None when no subscription key is configured;
    /// searches then fail with NotConfigured
    pub fn new(
        client: AzureMapsClient,
        credential: Option<MapCredential>,
        cache: Arc<ServicesCache>,
    ) -> Self {
        Self {
            client,
            credential,
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<ServicesCache> {
        &self.cache
    }

    /// Services within `radius` meters of `center`, nearest first
    pub async fn nearby(
        &self,
        center: Coordinate,
        radius: u32,
    ) -> Result<Arc<Vec<ServiceRecord>>, ServicesError> {
        if !center.is_valid() {
            return Err(ServicesError::InvalidInput(format!(
                "Coordinate out of range: {}",
                center
            )));
        }
        if radius == 0 || radius > MAX_RADIUS_M {
            return Err(ServicesError::InvalidInput(format!(
                "Radius must be between 1 and {} meters",
                MAX_RADIUS_M
            )));
        }

        let credential = self.credential.as_ref().ok_or_else(|| {
            log::error!("Nearby search requested but AZURE_MAPS_KEY is not configured");
            ServicesError::NotConfigured("Azure Maps subscription key".to_string())
        })?;

        let key = ServicesCache::key(center, radius);
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let mut services = self.client.search_nearby(credential, center, radius).await?;
        sort_by_distance(&mut services);

        let services = Arc::new(services);
        self.cache.insert(key, services.clone()).await;

        log::info!(
            "Nearby search at {} (radius {} m): {} services",
            center,
            radius,
            services.len()
        );

        Ok(services)
    }

    /// Render services as a GeoJSON FeatureCollection of points
    pub fn to_feature_collection(services: &[ServiceRecord]) -> FeatureCollection {
        let features = services
            .iter()
            .map(|service| {
                let point: Point<f64> = service.position().into();

                let mut properties = JsonObject::new();
                properties.insert("name".to_string(), service.name.clone().into());
                properties.insert("type".to_string(), service.service_type.clone().into());
                properties.insert("phone".to_string(), service.phone.clone().into());
                properties.insert("address".to_string(), service.address.clone().into());
                properties.insert("distance".to_string(), service.distance.into());

                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(Value::Point(vec![point.x(), point.y()]))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn search_for(server: &MockServer, credential: Option<MapCredential>) -> ServiceSearch {
        ServiceSearch::new(
            AzureMapsClient::new().with_base_url(server.url("/search")),
            credential,
            Arc::new(ServicesCache::new(60)),
        )
    }

    #[tokio::test]
    async fn test_nearby_sorts_and_caches() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(200).json_body(json!({
                    "results": [
                        {"dist": 900.0, "position": {"lat": 1.01, "lon": 2.0}, "poi": {"name": "Far"}},
                        {"dist": 100.0, "position": {"lat": 1.001, "lon": 2.0}, "poi": {"name": "Near"}}
                    ]
                }));
            })
            .await;

        let search = search_for(&server, MapCredential::subscription_key("key"));
        let center = Coordinate::new(1.0, 2.0);

        let first = search.nearby(center, 5000).await.unwrap();
        assert_eq!(first[0].name, "Near");
        assert_eq!(first[1].name, "Far");

        // Second call is served from cache
        let second = search.nearby(center, 5000).await.unwrap();
        assert_eq!(second.len(), 2);
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_nearby_rejects_invalid_input() {
        let server = MockServer::start_async().await;
        let search = search_for(&server, MapCredential::subscription_key("key"));

        let err = search.nearby(Coordinate::new(91.0, 0.0), 5000).await.unwrap_err();
        assert!(matches!(err, ServicesError::InvalidInput(_)));

        let err = search.nearby(Coordinate::new(1.0, 0.0), 0).await.unwrap_err();
        assert!(matches!(err, ServicesError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_nearby_without_key() {
        let server = MockServer::start_async().await;
        let search = search_for(&server, None);

        let err = search.nearby(Coordinate::new(1.0, 2.0), 5000).await.unwrap_err();
        assert!(matches!(err, ServicesError::NotConfigured(_)));
    }

    #[test]
    fn test_feature_collection() {
        let services = vec![ServiceRecord {
            name: "City Hospital".to_string(),
            service_type: "hospital".to_string(),
            phone: "555-1".to_string(),
            address: "1 Main St".to_string(),
            distance: 4321.0,
            longitude: 10.0,
            latitude: 20.0,
        }];

        let collection = ServiceSearch::to_feature_collection(&services);
        assert_eq!(collection.features.len(), 1);

        let feature = &collection.features[0];
        match &feature.geometry.as_ref().unwrap().value {
            Value::Point(coords) => assert_eq!(coords, &vec![10.0, 20.0]),
            other => panic!("unexpected geometry: {:?}", other),
        }
        assert_eq!(
            feature.property("name").and_then(|v| v.as_str()),
            Some("City Hospital")
        );
    }
}
