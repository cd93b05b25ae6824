//! HTTP adapter for the [`ConfigClient`] port.
//!
//! Talks to the account config API:
//!
//! ```text
//! GET  {server}/api/accounts/config/{uid}    fetch
//! POST {server}/api/accounts/config          save
//! GET  {server}/api/accounts/profile/{uid}   personal record
//! ```
//!
//! Every body that comes back is validated through the `acct-core` schema,
//! including that the record belongs to the account that was asked for.

use acct_core::protocol::{
    AccountResponse, ErrorResponse, FetchConfigResponse, SaveConfigRequest, SaveConfigResponse,
};
use acct_core::{Account, AccountConfig, AccountId, SchemaError};
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::{ClientError, ConfigClient};

pub struct HttpConfigClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpConfigClient {
    /// Creates a client for the API served at `server`.
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidUrl`] if `server` is not an absolute
    /// `http(s)` URL.
    pub fn new(server: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(server).map_err(|_| ClientError::InvalidUrl(server.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(server.to_string()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    /// Appends path segments to the server URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Loads the personal record for `account_id`, or `None` if the API
    /// has no such account.
    ///
    /// # Errors
    ///
    /// [`ClientError`] as for [`ConfigClient::fetch_config`].
    pub async fn fetch_account(&self, account_id: &AccountId) -> Result<Option<Account>, ClientError> {
        let url = self.endpoint(&["api", "accounts", "profile", account_id.as_str()])?;
        debug!("GET {url}");
        let body: AccountResponse = read_json(self.http.get(url).send().await?).await?;

        let Some(record) = body.account else {
            return Ok(None);
        };
        let account = Account::try_from(record)?;
        if &account.uid != account_id {
            return Err(SchemaError::AccountMismatch {
                expected: account_id.to_string(),
                found: account.uid.to_string(),
            }
            .into());
        }
        Ok(Some(account))
    }
}

/// Decodes a 2xx body as `T`; anything else becomes [`ClientError::Status`]
/// carrying the API's error message when it sent one.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json::<T>().await?)
}

#[async_trait]
impl ConfigClient for HttpConfigClient {
    async fn fetch_config(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<AccountConfig>, ClientError> {
        let url = self.endpoint(&["api", "accounts", "config", account_id.as_str()])?;
        debug!("GET {url}");
        let body: FetchConfigResponse = read_json(self.http.get(url).send().await?).await?;

        body.config
            .map(|record| record.into_config_for(account_id))
            .transpose()
            .map_err(ClientError::from)
    }

    async fn save_config(&self, config: &AccountConfig) -> Result<AccountConfig, ClientError> {
        let url = self.endpoint(&["api", "accounts", "config"])?;
        debug!("POST {url}");
        let request = SaveConfigRequest::from(config);
        let body: SaveConfigResponse =
            read_json(self.http.post(url).json(&request).send().await?).await?;

        Ok(body.config.into_config_for(config.account_id())?)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
