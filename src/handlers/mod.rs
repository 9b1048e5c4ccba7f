// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod admin;
pub mod health;
pub mod maps_token;
pub mod services;

pub use admin::config as admin_config;
pub use health::config as health_config;
pub use maps_token::config as maps_token_config;
pub use services::config as services_config;
