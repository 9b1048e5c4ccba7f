// src/handlers/health.rs
// DOCUMENTATION: Health check and root handlers
// PURPOSE: Simple endpoints to verify service status

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "nearby-emergency",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Welcome to the Emergency Services API"
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health_check));
}
