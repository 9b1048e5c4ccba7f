// src/client/mod.rs
// DOCUMENTATION: Client orchestrator module organization
// PURPOSE: Locate the user, open a map and list nearby emergency services

pub mod backend;
pub mod collaborators;
pub mod config;
pub mod console;
pub mod error;
pub mod location_store;
pub mod orchestrator;
pub mod render;
pub mod session;

pub use backend::ServicesSource;
pub use collaborators::*;
pub use config::{ClientConfig, CredentialSource, LocationMode, SearchMode};
pub use error::{ClientError, ErrorKind, Notice};
pub use location_store::{FileLocationStore, SavedLocation};
pub use orchestrator::{Collaborators, CycleOutcome, Orchestrator, TrackingSummary};
pub use session::{CycleTicket, Session};
