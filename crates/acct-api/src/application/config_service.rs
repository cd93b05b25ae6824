//! ConfigService: fetch and upsert of per-account configuration.
//!
//! The service is the only place that knows the upsert rule: "at most one
//! record per account; create it on first save, update it in place after
//! that".  Stores only offer plain find/insert/update primitives through the
//! [`ConfigRepository`] trait, which is injected at construction so the rule
//! can be tested without a database.

use std::sync::Arc;

use acct_core::{Account, AccountConfig, AccountId, SchemaError};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised by a [`ConfigRepository`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// An insert found a record already stored for this account.
    #[error("configuration for account {0} already exists")]
    AlreadyExists(AccountId),

    /// An update found no record for this account.
    #[error("no configuration stored for account {0}")]
    NotFound(AccountId),

    /// A stored record failed schema validation when loaded.
    #[error("stored record is invalid: {0}")]
    Invalid(#[from] SchemaError),

    /// The backing store failed (I/O, HTTP, serialization).
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Storage primitives for account configuration and account profiles.
///
/// Infrastructure implementations talk to memory, a TOML file, or the hosted
/// database; tests use the generated `MockConfigRepository`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    /// Returns the stored configuration, or `None` if the account has none.
    async fn find_config(&self, account_id: &AccountId)
        -> Result<Option<AccountConfig>, StoreError>;

    /// Stores a new record.  Fails with [`StoreError::AlreadyExists`] if one
    /// is present.
    async fn insert_config(&self, config: &AccountConfig) -> Result<AccountConfig, StoreError>;

    /// Replaces all four fields of an existing record.  Fails with
    /// [`StoreError::NotFound`] if none is present.
    async fn update_config(&self, config: &AccountConfig) -> Result<AccountConfig, StoreError>;

    /// Returns the profile of an account owner.
    async fn find_account(&self, account_id: &AccountId) -> Result<Option<Account>, StoreError>;
}

/// Application service behind the HTTP handlers.
#[derive(Clone)]
pub struct ConfigService {
    repo: Arc<dyn ConfigRepository>,
}

impl ConfigService {
    pub fn new(repo: Arc<dyn ConfigRepository>) -> Self {
        Self { repo }
    }

    /// Looks up the configuration for `account_id`.
    ///
    /// A missing record is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from the repository.
    pub async fn fetch_config(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<AccountConfig>, StoreError> {
        let config = self.repo.find_config(account_id).await?;
        debug!(
            "fetched config for {account_id}: {}",
            if config.is_some() { "found" } else { "not found" }
        );
        Ok(config)
    }

    /// Upserts `config` and returns the stored record.
    ///
    /// Updates the existing record when one is present, inserts otherwise.
    /// If another request inserts between our lookup and our insert, the
    /// insert reports `AlreadyExists` and we update instead, so repeating a
    /// save always converges on the same stored record.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from the repository.
    pub async fn save_config(&self, config: &AccountConfig) -> Result<AccountConfig, StoreError> {
        let account_id = config.account_id();

        if self.repo.find_config(account_id).await?.is_some() {
            info!("updating config for {account_id}");
            return self.repo.update_config(config).await;
        }

        info!("creating config for {account_id}");
        match self.repo.insert_config(config).await {
            Err(StoreError::AlreadyExists(_)) => {
                warn!("config for {account_id} appeared concurrently; updating instead");
                self.repo.update_config(config).await
            }
            other => other,
        }
    }

    /// Looks up the account owner's profile.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from the repository.
    pub async fn fetch_account(&self, account_id: &AccountId) -> Result<Option<Account>, StoreError> {
        self.repo.find_account(account_id).await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
