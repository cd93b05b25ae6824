//! acct-api library crate.
//!
//! HTTP service that stores one configuration record per account and lets
//! the editor fetch and upsert it.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Editor (JSON over HTTP)
//!         ↕
//! [acct-api]
//!   ├── domain/           ApiConfig, StoreSettings
//!   ├── application/      ConfigRepository port, ConfigService (upsert)
//!   └── infrastructure/
//!         ├── http_server/ axum router and handlers
//!         └── store/       memory, TOML file and Supabase adapters
//!         ↕
//! Hosted store (PostgREST) / local file / memory
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O.
//! - `application` depends on `domain` and `acct-core` only; stores are
//!   reached through the [`ConfigRepository`](application::ConfigRepository) trait.
//! - `infrastructure` implements the trait and owns all sockets and files.

pub mod application;
pub mod domain;
pub mod infrastructure;
