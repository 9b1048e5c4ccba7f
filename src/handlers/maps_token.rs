// src/handlers/maps_token.rs
// DOCUMENTATION: Map access token handler
// PURPOSE: Hand the configured bearer token to clients so the key never ships to them

use crate::config::Config;
use crate::errors::ServicesError;
use crate::models::MapsTokenResponse;
use actix_web::{web, HttpResponse, Responder};

/// GET /api/maps-token
pub async fn maps_token(config: web::Data<Config>) -> Result<impl Responder, ServicesError> {
    if config.azure_maps_token.is_empty() {
        log::warn!("Maps token requested but AZURE_MAPS_TOKEN is not configured");
        return Err(ServicesError::NotConfigured("Maps access token".to_string()));
    }

    Ok(HttpResponse::Ok().json(MapsTokenResponse {
        token: config.azure_maps_token.clone(),
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/maps-token", web::get().to(maps_token));
}
