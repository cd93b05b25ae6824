//! Domain layer for acct-api.
//!
//! Only service configuration lives here; the account configuration model
//! itself is shared with the editor and lives in `acct-core`.

pub mod config;

pub use config::{ApiConfig, StoreSettings};
