// src/client/session.rs
// DOCUMENTATION: Per-page-load state owned by the orchestrator
// PURPOSE: Map handle, cached credential and cycle bookkeeping without globals

use super::collaborators::MapHandle;
use crate::models::{Coordinate, MapCredential};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Identifies one tracking pass.
/// The token is a child of the tracking shutdown token, so it fires on
/// shutdown as well as when a newer position supersedes the pass.
#[derive(Debug, Clone)]
pub struct CycleTicket {
    pub generation: u64,
    pub token: CancellationToken,
}

/// The open map and where it is centered
struct OpenMap {
    handle: Box<dyn MapHandle>,
    center: Coordinate,
}

pub struct Session {
    id: Uuid,
    map: Option<OpenMap>,
    credential: Option<MapCredential>,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            map: None,
            credential: None,
            generation: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The open map handle with its center
    pub fn map_mut(&mut self) -> Option<(&mut (dyn MapHandle + 'static), Coordinate)> {
        self.map
            .as_mut()
            .map(|map| (map.handle.as_mut(), map.center))
    }

    /// Install a freshly opened map, dropping the previous one
    pub fn replace_map(&mut self, handle: Box<dyn MapHandle>, center: Coordinate) {
        self.map = Some(OpenMap { handle, center });
    }

    pub fn credential(&self) -> Option<&MapCredential> {
        self.credential.as_ref()
    }

    pub fn cache_credential(&mut self, credential: MapCredential) {
        self.credential = Some(credential);
    }

    /// Forget a credential the map platform rejected
    pub fn forget_credential(&mut self) {
        self.credential = None;
    }

    /// Start a tracking pass bound to `shutdown`
    pub fn begin_cycle(&mut self, shutdown: &CancellationToken) -> CycleTicket {
        self.generation += 1;
        CycleTicket {
            generation: self.generation,
            token: shutdown.child_token(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
