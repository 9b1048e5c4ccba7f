// src/client/render.rs
// DOCUMENTATION: Text rendering of service list entries

use crate::models::{distance_km, ServiceRecord};

/// One list entry, e.g.
/// `1. City Hospital (hospital) - 555-1 (4.32 km) Address: 1 Main St`
pub fn list_entry(rank: usize, service: &ServiceRecord) -> String {
    format!(
        "{}. {} ({}) - {} ({} km) Address: {}",
        rank,
        service.name,
        service.service_type,
        service.phone,
        distance_km(service.distance),
        service.address
    )
}
