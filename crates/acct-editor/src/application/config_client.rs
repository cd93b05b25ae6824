//! Port to the remote configuration store.

use acct_core::{AccountConfig, AccountId, SchemaError};
use async_trait::async_trait;
use thiserror::Error;

/// Failure talking to the configuration store.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured server URL cannot be used as a base for API paths.
    #[error("invalid server URL '{0}'")]
    InvalidUrl(String),

    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not pass schema validation.
    #[error("invalid response: {0}")]
    Schema(#[from] SchemaError),
}

/// Fetches and saves one account's configuration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigClient: Send + Sync {
    /// Returns the stored configuration, or `None` if the account has none.
    ///
    /// # Errors
    ///
    /// [`ClientError`] on transport failure, a non-2xx status, or a response
    /// that is invalid or belongs to another account.
    async fn fetch_config(&self, account_id: &AccountId)
        -> Result<Option<AccountConfig>, ClientError>;

    /// Creates or replaces the stored configuration and returns what was
    /// stored.
    ///
    /// # Errors
    ///
    /// [`ClientError`] as for [`ConfigClient::fetch_config`].
    async fn save_config(&self, config: &AccountConfig) -> Result<AccountConfig, ClientError>;
}
