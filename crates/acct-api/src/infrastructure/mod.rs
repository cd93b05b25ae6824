//! Infrastructure layer for acct-api.
//!
//! Owns all I/O: the HTTP listener and every store backend.
//!
//! # What does NOT belong here?
//!
//! - The upsert rule (application layer)
//! - Wire record definitions (`acct-core::protocol`)
//! - CLI parsing (done in `main.rs`)

pub mod http_server;
pub mod store;

pub use http_server::{router, run_server, ApiError};
pub use store::open_store;
