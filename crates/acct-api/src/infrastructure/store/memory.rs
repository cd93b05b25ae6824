//! In-process store backed by `HashMap`s.
//!
//! Used for local development and as the backend of the HTTP tests.  All
//! data is lost when the process exits.

use std::collections::HashMap;

use acct_core::{Account, AccountConfig, AccountId};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::{ConfigRepository, StoreError};

/// Volatile [`ConfigRepository`].
///
/// `RwLock` (the Tokio one) lets concurrent fetches proceed in parallel
/// while inserts and updates take exclusive access.
#[derive(Default)]
pub struct MemoryStore {
    configs: RwLock<HashMap<AccountId, AccountConfig>>,
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with account profiles.
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let accounts = accounts
            .into_iter()
            .map(|a| (a.uid.clone(), a))
            .collect::<HashMap<_, _>>();
        Self {
            configs: RwLock::default(),
            accounts: RwLock::new(accounts),
        }
    }
}

#[async_trait]
impl ConfigRepository for MemoryStore {
    async fn find_config(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<AccountConfig>, StoreError> {
        Ok(self.configs.read().await.get(account_id).cloned())
    }

    async fn insert_config(&self, config: &AccountConfig) -> Result<AccountConfig, StoreError> {
        let mut configs = self.configs.write().await;
        if configs.contains_key(config.account_id()) {
            return Err(StoreError::AlreadyExists(config.account_id().clone()));
        }
        configs.insert(config.account_id().clone(), config.clone());
        Ok(config.clone())
    }

    async fn update_config(&self, config: &AccountConfig) -> Result<AccountConfig, StoreError> {
        let mut configs = self.configs.write().await;
        match configs.get_mut(config.account_id()) {
            Some(existing) => {
                existing.overwrite_fields_from(config);
                Ok(existing.clone())
            }
            None => Err(StoreError::NotFound(config.account_id().clone())),
        }
    }

    async fn find_account(&self, account_id: &AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(account_id).cloned())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
