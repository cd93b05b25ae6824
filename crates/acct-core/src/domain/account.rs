//! Account identity and the read-only account profile.

use std::fmt;
use std::str::FromStr;

use super::error::SchemaError;

/// Opaque, stable identifier of one account.
///
/// The id is whatever the hosted store uses as its primary key (usually a
/// UUID string); this crate never interprets it beyond requiring it to be
/// non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(String);

impl AccountId {
    /// Validates and wraps a raw identifier.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptyAccountId`] if nothing is left after
    /// trimming.
    pub fn parse(raw: &str) -> Result<Self, SchemaError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SchemaError::EmptyAccountId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AccountId {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Profile of an account owner, shown next to the configuration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub uid: AccountId,
    pub email: String,
    /// Display name; `None` when the owner never set one.
    pub name: Option<String>,
}

impl Account {
    /// Name to display, falling back to `(unknown)`.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("(unknown)")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
