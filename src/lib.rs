// src/lib.rs
// DOCUMENTATION: Library root shared by the proxy server and the locate client

pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
