//! # acct-core
//!
//! Shared library for the account configuration service and editor.  It
//! defines the domain entities both sides agree on and the JSON wire
//! protocol used between them.
//!
//! This crate performs no I/O: no sockets, no files, no async runtime.
//!
//! # Architecture overview
//!
//! Each account owns one small configuration record: a website URL, a block
//! of free-text context, a set of "basis" flags telling agents how to use
//! that context, and a set of quality-assurance checklist items.
//!
//! - **`domain`** – The strongly typed model: [`AccountId`],
//!   [`AccountConfig`], the fixed vocabularies [`BasisOption`] and
//!   [`QaItem`], and the read-only [`Account`] profile.
//!
//! - **`protocol`** – The loosely typed JSON records exchanged over HTTP and
//!   the schema validation that turns them into domain values.  Anything
//!   coming from outside the process goes through `TryFrom` in this module
//!   before it becomes an `AccountConfig`.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `acct_core::AccountConfig` instead of `acct_core::domain::config::AccountConfig`.
pub use domain::account::{Account, AccountId};
pub use domain::config::AccountConfig;
pub use domain::vocabulary::{BasisOption, QaItem};
pub use domain::error::SchemaError;
