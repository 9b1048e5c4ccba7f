// src/client/collaborators.rs
// DOCUMENTATION: Seams between the orchestrator and its environment
// PURPOSE: Geolocation, map surface, list view, alerts and local persistence

use super::error::{ClientError, Notice};
use super::location_store::SavedLocation;
use crate::models::{Coordinate, MapCredential};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Device position source
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// One position fix. Unsupported or denied access is an error.
    async fn current_position(&self) -> Result<Coordinate, ClientError>;

    /// Continuous position updates; None when the device cannot watch
    fn watch(&self) -> Option<mpsc::Receiver<Coordinate>> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Red marker at the user's position
    User,
    /// Blue marker at a service
    Service,
}

/// A pin on the map
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: Coordinate,
    pub kind: MarkerKind,
    pub label: String,
}

impl Marker {
    pub fn user(position: Coordinate) -> Self {
        Self {
            position,
            kind: MarkerKind::User,
            label: "You are here".to_string(),
        }
    }

    pub fn service(position: Coordinate, label: impl Into<String>) -> Self {
        Self {
            position,
            kind: MarkerKind::Service,
            label: label.into(),
        }
    }
}

/// Factory for map widgets
#[async_trait]
pub trait MapSurface: Send + Sync {
    /// Construct a map centered on `center`.
    /// Resolves once the widget is ready to take markers.
    async fn open(
        &self,
        center: Coordinate,
        credential: &MapCredential,
    ) -> Result<Box<dyn MapHandle>, ClientError>;
}

/// A live map widget
pub trait MapHandle: Send {
    fn add_marker(&mut self, marker: Marker);
    fn clear_markers(&mut self);
    fn marker_count(&self) -> usize;
}

/// Ordered list of services shown next to the map
pub trait ListView: Send {
    fn clear(&mut self);
    fn append(&mut self, entry: String);
}

/// User-facing alert surface
pub trait Notifier: Send + Sync {
    fn alert(&self, notice: &Notice);
}

/// Single-entry store for the last known location
pub trait LocationStore: Send + Sync {
    fn load(&self) -> Option<SavedLocation>;
    fn save(&self, location: &SavedLocation) -> std::io::Result<()>;
}
