// src/main.rs
// DOCUMENTATION: Proxy server entry point
// PURPOSE: Initialize config, upstream search, and start HTTP server

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use nearby_emergency::config::{self, Config};
use nearby_emergency::handlers;
use nearby_emergency::services::start_cleanup_task;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", &config.log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting nearby-emergency proxy...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize upstream search (Azure Maps client, rate limiter, cache)
    let (search, cache) = config::build_search(&config);
    start_cleanup_task(cache, 300);
    log::info!("Started cache cleanup task (interval: 5 minutes)");

    // 5. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let search = web::Data::new(search);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(search.clone())
            .app_data(config.clone())
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            .configure(handlers::health_config)
            .configure(handlers::services_config)
            .configure(handlers::maps_token_config)
            .configure(handlers::admin_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
