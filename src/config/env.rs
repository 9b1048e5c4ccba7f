// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate proxy configuration from .env files

use crate::models::{DEFAULT_RADIUS_M, MAX_RADIUS_M};
use crate::services::{AZURE_SEARCH_URL, DEFAULT_CATEGORY_SET};
use dotenv::dotenv;
use std::env;
use std::str::FromStr;

/// Proxy configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 5000)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log filter used when RUST_LOG is unset
    pub log_level: String,

    /// Azure Maps subscription key used for upstream searches
    pub azure_maps_key: String,

    /// Bearer token handed to clients by GET /api/maps-token
    pub azure_maps_token: String,

    /// Azure Maps search nearby endpoint
    pub azure_search_url: String,

    /// Comma separated Azure category ids
    pub category_set: String,

    /// Radius used when a request omits one, in meters
    pub default_radius_m: u32,

    pub cache_ttl_seconds: u64,

    /// Upstream requests allowed per second across all workers
    pub upstream_rate_per_second: u32,

    /// Admin authentication token (for cache endpoints)
    pub admin_token: String,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    pub fn from_env() -> Self {
        dotenv().ok();

        Config {
            server_address: var_or("SERVER_ADDRESS", "127.0.0.1"),
            server_port: parse_or("SERVER_PORT", 5000),
            environment: var_or("ENVIRONMENT", "development"),
            log_level: var_or("LOG_LEVEL", "info,actix_web=info"),
            azure_maps_key: var_or("AZURE_MAPS_KEY", ""),
            azure_maps_token: var_or("AZURE_MAPS_TOKEN", ""),
            azure_search_url: var_or("AZURE_SEARCH_URL", AZURE_SEARCH_URL),
            category_set: var_or("SEARCH_CATEGORY_SET", DEFAULT_CATEGORY_SET),
            default_radius_m: parse_or("DEFAULT_RADIUS_M", DEFAULT_RADIUS_M),
            cache_ttl_seconds: parse_or("CACHE_TTL_SECONDS", 600),
            upstream_rate_per_second: parse_or("UPSTREAM_RATE_PER_SECOND", 10),
            admin_token: var_or("ADMIN_TOKEN", "admin-token-dev"),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Hard errors stop startup; missing credentials only warn
    pub fn validate(&self) -> Result<(), String> {
        if self.default_radius_m == 0 || self.default_radius_m > MAX_RADIUS_M {
            return Err(format!(
                "DEFAULT_RADIUS_M must be between 1 and {}",
                MAX_RADIUS_M
            ));
        }

        if self.upstream_rate_per_second == 0 {
            return Err("UPSTREAM_RATE_PER_SECOND must be positive".to_string());
        }

        if self.azure_maps_key.is_empty() {
            log::warn!("AZURE_MAPS_KEY not configured - /services will return 503");
        }

        if self.azure_maps_token.is_empty() {
            log::warn!("AZURE_MAPS_TOKEN not configured - /api/maps-token will return 503");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_address: "127.0.0.1".to_string(),
            server_port: 5000,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            azure_maps_key: String::new(),
            azure_maps_token: String::new(),
            azure_search_url: AZURE_SEARCH_URL.to_string(),
            category_set: DEFAULT_CATEGORY_SET.to_string(),
            default_radius_m: DEFAULT_RADIUS_M,
            cache_ttl_seconds: 600,
            upstream_rate_per_second: 10,
            admin_token: "admin-token-dev".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_radius() {
        let config = Config {
            default_radius_m: MAX_RADIUS_M + 1,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            upstream_rate_per_second: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
