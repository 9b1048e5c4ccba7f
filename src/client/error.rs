// src/client/error.rs
// DOCUMENTATION: Client-side failure kinds and the user-facing notices they become
// PURPOSE: One error enum for the whole locate -> map -> fetch -> render flow

use thiserror::Error;

/// Discriminant of a ClientError, also the kind of the notice it raises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    GeolocationUnavailable,
    MissingCredential,
    TokenUnavailable,
    MapInitFailed,
    Connectivity,
    FetchFailed,
    NoServicesFound,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Geolocation unavailable: {0}")]
    GeolocationUnavailable(String),

    #[error("Map credential is missing or invalid")]
    MissingCredential,

    #[error("Maps token unavailable: {0}")]
    TokenUnavailable(String),

    #[error("Map initialization failed: {0}")]
    MapInit(String),

    #[error("Network error: {0}")]
    Connectivity(String),

    #[error("Services request failed with status {0}")]
    Status(u16),

    #[error("No services within {radius_m} m: {detail}")]
    EmptyResult { radius_m: u32, detail: String },
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::GeolocationUnavailable(_) => ErrorKind::GeolocationUnavailable,
            ClientError::MissingCredential => ErrorKind::MissingCredential,
            ClientError::TokenUnavailable(_) => ErrorKind::TokenUnavailable,
            ClientError::MapInit(_) => ErrorKind::MapInitFailed,
            ClientError::Connectivity(_) => ErrorKind::Connectivity,
            ClientError::Status(_) => ErrorKind::FetchFailed,
            ClientError::EmptyResult { .. } => ErrorKind::NoServicesFound,
        }
    }

    /// The alert shown to the user for this error
    pub fn notice(&self) -> Notice {
        let message = match self {
            ClientError::GeolocationUnavailable(_) => {
                "Failed to get your location. Please enable location services.".to_string()
            }
            ClientError::MissingCredential => {
                "Azure Maps Key is required to load the map.".to_string()
            }
            ClientError::TokenUnavailable(_) => {
                "Unable to obtain map access from the server.".to_string()
            }
            ClientError::MapInit(_) => {
                "Failed to load the map. Please check the console for details.".to_string()
            }
            ClientError::Connectivity(_) => {
                "Unable to connect to the server. Please check your network.".to_string()
            }
            ClientError::Status(_) => "Error fetching services from backend.".to_string(),
            ClientError::EmptyResult { radius_m, .. } => format!(
                "No emergency services found within a {}km radius.",
                *radius_m as f64 / 1000.0
            ),
        };

        Notice {
            kind: self.kind(),
            message,
        }
    }
}

/// A user-facing alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: ErrorKind,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_status_notices_differ() {
        let empty = ClientError::EmptyResult {
            radius_m: 5000,
            detail: "empty array".to_string(),
        }
        .notice();
        let status = ClientError::Status(500).notice();

        assert_eq!(empty.kind, ErrorKind::NoServicesFound);
        assert_eq!(status.kind, ErrorKind::FetchFailed);
        assert_ne!(empty.message, status.message);
        assert_eq!(
            empty.message,
            "No emergency services found within a 5km radius."
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            ClientError::MapInit("x".into()).kind(),
            ErrorKind::MapInitFailed
        );
        assert_eq!(
            ClientError::Connectivity("x".into()).kind(),
            ErrorKind::Connectivity
        );
    }
}
