// src/config/mod.rs
// DOCUMENTATION: Configuration module organization
// PURPOSE: Re-export configuration components

pub mod env;
pub mod upstream;

pub use env::Config;
pub use upstream::build_search;
