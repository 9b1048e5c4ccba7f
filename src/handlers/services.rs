// src/handlers/services.rs
// DOCUMENTATION: HTTP handlers for nearby emergency services
// PURPOSE: Parse requests, call ServiceSearch, return responses

use crate::config::Config;
use crate::errors::ServicesError;
use crate::models::{Coordinate, NearbyServicesQuery, NearbyServicesRequest, ServicesResponse};
use crate::services::ServiceSearch;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// POST /services, POST /api/services
/// Body `{latitude, longitude, radius}`; returns a JSON array sorted by distance
pub async fn nearby_services(
    search: web::Data<ServiceSearch>,
    config: web::Data<Config>,
    req: web::Json<NearbyServicesRequest>,
) -> Result<impl Responder, ServicesError> {
    if let Err(e) = req.validate() {
        return Err(ServicesError::ValidationError(e.to_string()));
    }

    let radius = req.radius.unwrap_or(config.default_radius_m);
    log::info!(
        "Nearby services requested at {} (radius {} m)",
        req.center(),
        radius
    );

    let services = search.nearby(req.center(), radius).await?;
    Ok(HttpResponse::Ok().json(services.as_slice()))
}

/// GET /services?lat=..&lon=..&radius=..&format=geojson
/// Returns `{services, count}` or a GeoJSON FeatureCollection
pub async fn nearby_services_query(
    search: web::Data<ServiceSearch>,
    config: web::Data<Config>,
    query: web::Query<NearbyServicesQuery>,
) -> Result<impl Responder, ServicesError> {
    let (lat, lon) = match (query.lat, query.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            return Err(ServicesError::InvalidInput(
                "Latitude and Longitude are required".to_string(),
            ))
        }
    };

    let radius = query.radius.unwrap_or(config.default_radius_m);
    let services = search.nearby(Coordinate::new(lat, lon), radius).await?;

    match query.format.as_deref() {
        Some("geojson") => Ok(HttpResponse::Ok()
            .content_type("application/geo+json")
            .json(ServiceSearch::to_feature_collection(&services))),
        None | Some("json") => {
            Ok(HttpResponse::Ok().json(ServicesResponse::from(services.to_vec())))
        }
        Some(other) => Err(ServicesError::InvalidInput(format!(
            "Unsupported format: {}",
            other
        ))),
    }
}

/// Body and query extraction failures use the same error envelope as every other error
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::warn!("Rejected services body: {}", err);
        ServicesError::InvalidInput(err.to_string()).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        log::warn!("Rejected services query: {}", err);
        ServicesError::InvalidInput(err.to_string()).into()
    })
}

/// Configuration for service routes
/// Both the bare and the /api-prefixed paths are served
pub fn config(cfg: &mut web::ServiceConfig) {
    for path in ["/services", "/api/services"] {
        cfg.service(
            web::resource(path)
                .app_data(json_config())
                .app_data(query_config())
                .route(web::post().to(nearby_services))
                .route(web::get().to(nearby_services_query)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MapCredential, ServiceRecord};
    use crate::services::{AzureMapsClient, ServicesCache};
    use actix_web::{http::StatusCode, test, App};
    use httpmock::prelude::*;
    use serde_json::json;
    use std::sync::Arc;

    async fn upstream() -> MockServer {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(200).json_body(json!({
                    "results": [
                        {"dist": 2500.0, "position": {"lat": 40.02, "lon": -3.7},
                         "poi": {"name": "Police HQ", "categorySet": [{"id": 7322}]}},
                        {"dist": 400.0, "position": {"lat": 40.004, "lon": -3.7},
                         "poi": {"name": "Clinic", "phone": "555-9", "categorySet": [{"id": 7321}]},
                         "address": {"freeformAddress": "2 Side St"}}
                    ]
                }));
            })
            .await;
        server
    }

    fn search_data(server: &MockServer) -> web::Data<ServiceSearch> {
        web::Data::new(ServiceSearch::new(
            AzureMapsClient::new().with_base_url(server.url("/search")),
            MapCredential::subscription_key("key"),
            Arc::new(ServicesCache::new(60)),
        ))
    }

    #[actix_web::test]
    async fn test_post_services_returns_sorted_array() {
        let server = upstream().await;
        let app = test::init_service(
            App::new()
                .app_data(search_data(&server))
                .app_data(web::Data::new(Config::default()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/services")
            .set_json(json!({"latitude": 40.0, "longitude": -3.7, "radius": 5000}))
            .to_request();
        let services: Vec<ServiceRecord> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(services.len(), 2);
        assert_eq!(services[0].name, "Clinic");
        assert_eq!(services[0].service_type, "hospital");
        assert_eq!(services[1].name, "Police HQ");
    }

    #[actix_web::test]
    async fn test_post_services_validates_body() {
        let server = upstream().await;
        let app = test::init_service(
            App::new()
                .app_data(search_data(&server))
                .app_data(web::Data::new(Config::default()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/services")
            .set_json(json!({"latitude": 123.0, "longitude": -3.7}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_get_services_requires_coordinates() {
        let server = upstream().await;
        let app = test::init_service(
            App::new()
                .app_data(search_data(&server))
                .app_data(web::Data::new(Config::default()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/services?lat=40.0").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/services?lat=40.0&lon=-3.7")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["services"][0]["name"], "Clinic");
    }

    #[actix_web::test]
    async fn test_get_services_geojson() {
        let server = upstream().await;
        let app = test::init_service(
            App::new()
                .app_data(search_data(&server))
                .app_data(web::Data::new(Config::default()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/services?lat=40.0&lon=-3.7&format=geojson")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["type"], "FeatureCollection");
        assert_eq!(body["features"].as_array().map(|f| f.len()), Some(2));
    }

    #[actix_web::test]
    async fn test_malformed_requests_use_error_envelope() {
        let server = upstream().await;
        let app = test::init_service(
            App::new()
                .app_data(search_data(&server))
                .app_data(web::Data::new(Config::default()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/services")
            .set_json(json!({"longitude": 1.0}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
        assert!(body["error"]["message"]
            .as_str()
            .is_some_and(|m| m.contains("latitude")));

        let req = test::TestRequest::get()
            .uri("/api/services?lat=abc&lon=1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
        assert!(body["error"]["timestamp"].is_string());
    }
}
