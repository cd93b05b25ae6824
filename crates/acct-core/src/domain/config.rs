//! The per-account configuration record.
//!
//! [`AccountConfig`] is used both as the editor's in-memory draft and as the
//! persisted value in the store.  There is at most one per account.

use std::collections::BTreeSet;

use super::account::AccountId;
use super::vocabulary::{BasisOption, QaItem};

/// Configuration of one account.
///
/// The account id is fixed at construction and only readable afterwards;
/// the four editable fields are public.
///
/// # Example
///
/// ```rust
/// use acct_core::{AccountConfig, AccountId, QaItem};
///
/// let mut cfg = AccountConfig::new(AccountId::parse("acct-1").unwrap());
/// cfg.qa.insert(QaItem::VerifiedCaller);
/// assert!(cfg.url.is_empty());
/// assert!(cfg.qa.contains(&QaItem::VerifiedCaller));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountConfig {
    account_id: AccountId,
    /// Website URL; free text, not validated.
    pub url: String,
    /// Free-text context given to agents.
    pub context: String,
    /// Strategies to use when engaging with the context.
    pub basis: BTreeSet<BasisOption>,
    /// Checklist items currently marked true.
    pub qa: BTreeSet<QaItem>,
}

impl AccountConfig {
    /// Returns an empty configuration for `account_id`.
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            url: String::new(),
            context: String::new(),
            basis: BTreeSet::new(),
            qa: BTreeSet::new(),
        }
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// Copies the four editable fields from `other`, keeping this record's
    /// account id.
    pub fn overwrite_fields_from(&mut self, other: &AccountConfig) {
        self.url.clone_from(&other.url);
        self.context.clone_from(&other.context);
        self.basis.clone_from(&other.basis);
        self.qa.clone_from(&other.qa);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
