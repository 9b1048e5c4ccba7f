// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for the search cache
// PURPOSE: Inspect and flush cached upstream results

use crate::config::Config;
use crate::errors::ServicesError;
use crate::services::ServiceSearch;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

/// GET /admin/cache/stats
pub async fn cache_stats(
    search: web::Data<ServiceSearch>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<impl Responder, ServicesError> {
    verify_admin_token(&req, &config)?;

    let stats = search.cache().stats().await;
    Ok(HttpResponse::Ok().json(stats))
}

/// DELETE /admin/cache
pub async fn clear_cache(
    search: web::Data<ServiceSearch>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<impl Responder, ServicesError> {
    verify_admin_token(&req, &config)?;

    let removed = search.cache().clear().await;
    log::info!("Admin cleared search cache ({} entries)", removed);

    Ok(HttpResponse::Ok().json(json!({ "removed": removed })))
}

/// Checks X-Admin-Token header against the configured admin token
fn verify_admin_token(req: &HttpRequest, config: &Config) -> Result<(), ServicesError> {
    let token = req
        .headers()
        .get("X-Admin-Token")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            log::warn!("Admin request without token");
            ServicesError::Unauthorized
        })?;

    if token != config.admin_token {
        log::warn!("Admin request with invalid token");
        return Err(ServicesError::Forbidden);
    }

    Ok(())
}

/// Configuration for admin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/cache/stats", web::get().to(cache_stats))
            .route("/cache", web::delete().to(clear_cache)),
    );
}
