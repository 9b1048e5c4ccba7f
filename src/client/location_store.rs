// src/client/location_store.rs
// DOCUMENTATION: Persistence of the last known location
// PURPOSE: JSON text under a single key, read before asking geolocation

use super::collaborators::LocationStore;
use crate::models::Coordinate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl SavedLocation {
    pub fn now(coordinate: Coordinate) -> Self {
        Self {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            saved_at: Some(Utc::now()),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Stores the location as a JSON file
pub struct FileLocationStore {
    path: PathBuf,
}

impl FileLocationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LocationStore for FileLocationStore {
    /// Missing or unreadable files count as "nothing saved"
    fn load(&self) -> Option<SavedLocation> {
        let text = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<SavedLocation>(&text) {
            Ok(saved) if saved.coordinate().is_valid() => Some(saved),
            Ok(saved) => {
                log::warn!("Ignoring out-of-range saved location {}", saved.coordinate());
                None
            }
            Err(e) => {
                log::warn!("Ignoring corrupt saved location {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn save(&self, location: &SavedLocation) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string(location)?;
        fs::write(&self.path, text)
    }
}
