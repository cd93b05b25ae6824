//! TOML file store.
//!
//! Keeps every account profile and configuration in one human-editable
//! document:
//!
//! ```toml
//! [[accounts]]
//! uid = "acct-1"
//! email = "owner@example.com"
//! name = "Dana"
//!
//! [[configs]]
//! account = "acct-1"
//! url = "https://example.com"
//! context = "Prefers email follow-ups"
//! basis = ["support-context"]
//! qa = ["verified-caller"]
//! ```
//!
//! Each write re-reads the file, applies the change and rewrites it while
//! holding an async mutex, so concurrent requests inside one process never
//! lose updates.  A missing file is treated as an empty store.  Records are
//! schema-validated on the way out, exactly like rows from the hosted store.

use std::path::{Path, PathBuf};

use acct_core::protocol::{AccountRecord, ConfigRecord};
use acct_core::{Account, AccountConfig, AccountId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::{ConfigRepository, StoreError};

/// On-disk document layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    accounts: Vec<AccountRecord>,
    #[serde(default)]
    configs: Vec<ConfigRecord>,
}

impl StoreDocument {
    fn position(&self, account_id: &AccountId) -> Option<usize> {
        self.configs
            .iter()
            .position(|c| c.account.trim() == account_id.as_str())
    }
}

/// [`ConfigRepository`] persisted to a TOML file.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<StoreDocument, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                StoreError::Backend(format!("failed to parse {}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreDocument::default()),
            Err(e) => Err(StoreError::Backend(format!(
                "failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    async fn persist(&self, doc: &StoreDocument) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                StoreError::Backend(format!("failed to create {}: {e}", dir.display()))
            })?;
        }

        let content = toml::to_string_pretty(doc)
            .map_err(|e| StoreError::Backend(format!("failed to serialize store: {e}")))?;
        tokio::fs::write(&self.path, content).await.map_err(|e| {
            StoreError::Backend(format!("failed to write {}: {e}", self.path.display()))
        })?;
        debug!("wrote {} config record(s) to {}", doc.configs.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl ConfigRepository for FileStore {
    async fn find_config(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<AccountConfig>, StoreError> {
        let _guard = self.lock.lock().await;
        let doc = self.load().await?;
        match doc.position(account_id) {
            Some(i) => Ok(Some(AccountConfig::try_from(doc.configs[i].clone())?)),
            None => Ok(None),
        }
    }

    async fn insert_config(&self, config: &AccountConfig) -> Result<AccountConfig, StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        if doc.position(config.account_id()).is_some() {
            return Err(StoreError::AlreadyExists(config.account_id().clone()));
        }
        doc.configs.push(ConfigRecord::from(config));
        self.persist(&doc).await?;
        Ok(config.clone())
    }

    async fn update_config(&self, config: &AccountConfig) -> Result<AccountConfig, StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        let Some(i) = doc.position(config.account_id()) else {
            return Err(StoreError::NotFound(config.account_id().clone()));
        };
        doc.configs[i] = ConfigRecord::from(config);
        self.persist(&doc).await?;
        Ok(config.clone())
    }

    async fn find_account(&self, account_id: &AccountId) -> Result<Option<Account>, StoreError> {
        let _guard = self.lock.lock().await;
        let doc = self.load().await?;
        doc.accounts
            .into_iter()
            .find(|a| a.uid.trim() == account_id.as_str())
            .map(Account::try_from)
            .transpose()
            .map_err(StoreError::from)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
