//! Validation errors raised when outside data is turned into domain values.

use thiserror::Error;

/// A value failed schema validation.
///
/// Raised at the process boundary: when the API parses a request body, when
/// a store adapter loads a record, and when the editor parses a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The account identifier was empty or whitespace only.
    #[error("account id must not be empty")]
    EmptyAccountId,

    /// A basis tag was not one of the known options.
    #[error("unknown basis option: {0:?}")]
    UnknownBasis(String),

    /// A QA tag was not one of the known checklist items.
    #[error("unknown QA item: {0:?}")]
    UnknownQaItem(String),

    /// A record was returned for a different account than the one requested.
    #[error("record belongs to account {found:?}, expected {expected:?}")]
    AccountMismatch { expected: String, found: String },
}
