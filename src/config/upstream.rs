// src/config/upstream.rs
// DOCUMENTATION: Upstream search initialization
// PURPOSE: Build the shared Azure Maps client, rate limiter and cache

use crate::config::Config;
use crate::models::MapCredential;
use crate::services::{AzureMapsClient, ServiceSearch, ServicesCache};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Initialize the nearby search service
/// DOCUMENTATION: Called once during startup in main.rs; the returned
/// service and cache are shared by every worker
pub fn build_search(config: &Config) -> (ServiceSearch, Arc<ServicesCache>) {
    log::info!("Initializing Azure Maps client: {}", config.azure_search_url);

    let rate = NonZeroU32::new(config.upstream_rate_per_second).unwrap_or(NonZeroU32::MIN);
    let limiter = Arc::new(RateLimiter::direct(Quota::per_second(rate)));

    let client = AzureMapsClient::new()
        .with_base_url(config.azure_search_url.clone())
        .with_category_set(config.category_set.clone())
        .with_rate_limiter(limiter);

    let cache = Arc::new(ServicesCache::new(config.cache_ttl_seconds));
    let credential = MapCredential::subscription_key(&config.azure_maps_key);

    log::info!(
        "Nearby search ready (rate: {}/s, cache TTL: {}s, key configured: {})",
        rate,
        config.cache_ttl_seconds,
        credential.is_some()
    );

    (ServiceSearch::new(client, credential, cache.clone()), cache)
}
