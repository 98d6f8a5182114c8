//! Shared service infrastructure for the Lode gateway.
//!
//! This crate provides the components the gateway binary is assembled from:
//! - Config (protocol constants, listen address, chunk size)
//! - State management (ledger client + protocol wiring)
//! - Content read ops (primary fetch → locate → reconstruct)
//! - HTTP handlers (health checks, content serving)

pub mod config;
pub mod content;
pub mod http;
pub mod state;

// Re-export key types for convenience
pub use config::Config;
pub use state::{State as ServiceState, StateSetupError};
