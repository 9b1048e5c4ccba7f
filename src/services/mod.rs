// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod azure_maps_client;
pub mod cache;
pub mod service_search;

pub use azure_maps_client::*;
pub use cache::*;
pub use service_search::*;
