//! Domain layer for acct-core.
//!
//! Pure types with no dependencies on I/O or frameworks.  Invalid states
//! are kept unrepresentable where the type system allows it: account ids are
//! non-empty, and basis/QA tags are enums rather than free strings.

pub mod account;
pub mod config;
pub mod error;
pub mod vocabulary;

pub use account::{Account, AccountId};
pub use config::AccountConfig;
pub use error::SchemaError;
pub use vocabulary::{BasisOption, QaItem};
