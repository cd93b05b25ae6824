//! Application layer for acct-api.
//!
//! Knows *what* a fetch and a save mean; delegates *how* records are stored
//! to the infrastructure layer through [`ConfigRepository`].
//!
//! # What does NOT belong here?
//!
//! - HTTP routing or status codes (infrastructure)
//! - File, database or network access (infrastructure)

pub mod config_service;

pub use config_service::{ConfigRepository, ConfigService, StoreError};
