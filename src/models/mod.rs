// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod coordinate;
pub mod credential;
pub mod service;

pub use coordinate::*;
pub use credential::*;
pub use service::*;
