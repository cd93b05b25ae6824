//! Hosted store adapter: Supabase / PostgREST over HTTPS.
//!
//! The hosted database exposes each table as a REST resource:
//!
//! ```text
//! GET   {url}/rest/v1/account-config?account=eq.{id}&select=*   → [row] | []
//! POST  {url}/rest/v1/account-config                            → [row]   (insert)
//! PATCH {url}/rest/v1/account-config?account=eq.{id}            → [row] | []  (update)
//! GET   {url}/rest/v1/accounts?uid=eq.{id}&select=*             → [row] | []
//! ```
//!
//! Every request carries the service key twice, as the `apikey` header and
//! as a bearer token.  `Prefer: return=representation` makes inserts and
//! updates echo the stored rows, which are then schema-validated like any
//! other input.

use acct_core::protocol::{AccountRecord, ConfigRecord};
use acct_core::{Account, AccountConfig, AccountId};
use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::{ConfigRepository, StoreError};

const CONFIG_TABLE: &str = "account-config";
const ACCOUNTS_TABLE: &str = "accounts";

/// [`ConfigRepository`] backed by a hosted PostgREST endpoint.
pub struct SupabaseStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Builds `{base}/rest/v1/{table}?{column}=eq.{value}[&select=*]`.
    fn filter_url(
        &self,
        table: &str,
        column: &str,
        value: &str,
        select_all: bool,
    ) -> Result<Url, StoreError> {
        let base = format!("{}/rest/v1/{table}", self.base_url.trim_end_matches('/'));
        let mut params = vec![(column.to_string(), format!("eq.{value}"))];
        if select_all {
            params.push(("select".to_string(), "*".to_string()));
        }
        Url::parse_with_params(&base, &params)
            .map_err(|e| StoreError::Backend(format!("invalid store URL {base:?}: {e}")))
    }

    fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        let base = format!("{}/rest/v1/{table}", self.base_url.trim_end_matches('/'));
        Url::parse(&base).map_err(|e| StoreError::Backend(format!("invalid store URL {base:?}: {e}")))
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

/// Failure of a single REST call, before it is mapped to [`StoreError`].
#[derive(Debug, Error)]
enum RestError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store responded {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl From<RestError> for StoreError {
    fn from(e: RestError) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Sends a request and decodes the JSON array of rows it returns.
async fn fetch_rows<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<Vec<T>, RestError> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(RestError::Status { status, body });
    }

    Ok(response.json::<Vec<T>>().await?)
}

#[async_trait]
impl ConfigRepository for SupabaseStore {
    async fn find_config(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<AccountConfig>, StoreError> {
        let url = self.filter_url(CONFIG_TABLE, "account", account_id.as_str(), true)?;
        let rows: Vec<ConfigRecord> = fetch_rows(self.request(Method::GET, url)).await?;
        debug!("store returned {} config row(s) for {account_id}", rows.len());

        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.into_config_for(account_id)?)),
            None => Ok(None),
        }
    }

    async fn insert_config(&self, config: &AccountConfig) -> Result<AccountConfig, StoreError> {
        let url = self.table_url(CONFIG_TABLE)?;
        let request = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(&ConfigRecord::from(config));

        match fetch_rows::<ConfigRecord>(request).await {
            Ok(rows) => match rows.into_iter().next() {
                Some(row) => Ok(row.into_config_for(config.account_id())?),
                // Some deployments strip the representation; fall back to the input.
                None => Ok(config.clone()),
            },
            // PostgREST maps unique-key violations to 409.
            Err(RestError::Status {
                status: StatusCode::CONFLICT,
                body,
            }) => {
                warn!("insert for {} conflicted: {body}", config.account_id());
                Err(StoreError::AlreadyExists(config.account_id().clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_config(&self, config: &AccountConfig) -> Result<AccountConfig, StoreError> {
        let url = self.filter_url(CONFIG_TABLE, "account", config.account_id().as_str(), false)?;
        let request = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(&ConfigRecord::from(config));

        let rows: Vec<ConfigRecord> = fetch_rows(request).await?;
        match rows.into_iter().next() {
            Some(row) => Ok(row.into_config_for(config.account_id())?),
            None => Err(StoreError::NotFound(config.account_id().clone())),
        }
    }

    async fn find_account(&self, account_id: &AccountId) -> Result<Option<Account>, StoreError> {
        let url = self.filter_url(ACCOUNTS_TABLE, "uid", account_id.as_str(), true)?;
        let rows: Vec<AccountRecord> = fetch_rows(self.request(Method::GET, url)).await?;
        rows.into_iter()
            .next()
            .map(Account::try_from)
            .transpose()
            .map_err(StoreError::from)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use acct_core::{BasisOption, QaItem};
    use axum::extract::State;
    use axum::http::{HeaderMap, Uri};
    use axum::Router;
    use tokio::net::TcpListener;

    /// One request as the stub received it.
    #[derive(Debug, Clone)]
    struct Seen {
        method: Method,
        target: String,
        apikey: Option<String>,
        authorization: Option<String>,
        prefer: Option<String>,
        body: String,
    }

    /// Canned PostgREST endpoint: records every request and answers each
    /// one with the same status and body.
    struct Stub {
        status: StatusCode,
        body: String,
        seen: Mutex<Vec<Seen>>,
    }

    async fn answer(
        State(stub): State<Arc<Stub>>,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: String,
    ) -> (StatusCode, String) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        stub.seen.lock().unwrap().push(Seen {
            method,
            target: uri.to_string(),
            apikey: header("apikey"),
            authorization: header("authorization"),
            prefer: header("prefer"),
            body,
        });
        (stub.status, stub.body.clone())
    }

    /// Serves the stub on an ephemeral loopback port; returns a store
    /// pointed at it and the stub for inspection.
    async fn serve_stub(status: StatusCode, body: &str) -> (SupabaseStore, Arc<Stub>) {
        let stub = Arc::new(Stub {
            status,
            body: body.to_string(),
            seen: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(answer).with_state(Arc::clone(&stub));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (SupabaseStore::new(format!("http://{addr}"), "service-key"), stub)
    }

    fn only_request(stub: &Stub) -> Seen {
        let seen = stub.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        seen[0].clone()
    }

    fn acct() -> AccountId {
        AccountId::parse("acct-1").unwrap()
    }

    fn sample() -> AccountConfig {
        let mut cfg = AccountConfig::new(acct());
        cfg.url = "https://example.com".to_string();
        cfg.context = "ctx".to_string();
        cfg.basis.insert(BasisOption::SupportContext);
        cfg.qa.insert(QaItem::VerifiedCaller);
        cfg
    }

    const SAMPLE_ROW: &str = r#"[{"id":7,"account":"acct-1","url":"https://example.com","context":"ctx","basis":["support-context"],"qa":["verified-caller"]}]"#;

    #[test]
    fn test_filter_url_for_config_lookup() {
        // Arrange
        let store = SupabaseStore::new("https://xyz.supabase.co/", "key");

        // Act
        let url = store
            .filter_url(CONFIG_TABLE, "account", "acct-1", true)
            .unwrap();

        // Assert
        assert_eq!(
            url.as_str(),
            "https://xyz.supabase.co/rest/v1/account-config?account=eq.acct-1&select=*"
        );
    }

    #[test]
    fn test_filter_url_escapes_account_id() {
        let store = SupabaseStore::new("https://xyz.supabase.co", "key");
        let url = store
            .filter_url(ACCOUNTS_TABLE, "uid", "a&b c", false)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://xyz.supabase.co/rest/v1/accounts?uid=eq.a%26b+c"
        );
    }

    #[test]
    fn test_invalid_base_url_is_backend_error() {
        let store = SupabaseStore::new("not a url", "key");
        let result = store.table_url(CONFIG_TABLE);
        assert!(matches!(result, Err(StoreError::Backend(_))));
    }

    #[tokio::test]
    async fn test_find_config_sends_key_headers_and_decodes_row() {
        // Arrange
        let (store, stub) = serve_stub(StatusCode::OK, SAMPLE_ROW).await;

        // Act
        let found = store.find_config(&acct()).await.unwrap();

        // Assert
        assert_eq!(found, Some(sample()));
        let seen = only_request(&stub);
        assert_eq!(seen.method, Method::GET);
        assert_eq!(seen.target, "/rest/v1/account-config?account=eq.acct-1&select=*");
        assert_eq!(seen.apikey.as_deref(), Some("service-key"));
        assert_eq!(seen.authorization.as_deref(), Some("Bearer service-key"));
        assert!(seen.prefer.is_none());
    }

    #[tokio::test]
    async fn test_find_config_with_no_rows_is_none() {
        let (store, _) = serve_stub(StatusCode::OK, "[]").await;

        let found = store.find_config(&acct()).await.unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_insert_asks_for_representation_and_posts_record() {
        // Arrange
        let (store, stub) = serve_stub(StatusCode::CREATED, SAMPLE_ROW).await;

        // Act
        let stored = store.insert_config(&sample()).await.unwrap();

        // Assert
        assert_eq!(stored, sample());
        let seen = only_request(&stub);
        assert_eq!(seen.method, Method::POST);
        assert_eq!(seen.target, "/rest/v1/account-config");
        assert_eq!(seen.prefer.as_deref(), Some("return=representation"));
        assert_eq!(seen.apikey.as_deref(), Some("service-key"));
        assert_eq!(seen.authorization.as_deref(), Some("Bearer service-key"));
        let sent: ConfigRecord = serde_json::from_str(&seen.body).unwrap();
        assert_eq!(sent, ConfigRecord::from(&sample()));
    }

    #[tokio::test]
    async fn test_insert_without_representation_returns_input() {
        let (store, _) = serve_stub(StatusCode::CREATED, "[]").await;

        let stored = store.insert_config(&sample()).await.unwrap();

        assert_eq!(stored, sample());
    }

    #[tokio::test]
    async fn test_insert_conflict_is_already_exists() {
        // Arrange
        let (store, _) = serve_stub(
            StatusCode::CONFLICT,
            r#"{"code":"23505","message":"duplicate key value"}"#,
        )
        .await;

        // Act
        let result = store.insert_config(&sample()).await;

        // Assert
        assert!(matches!(result, Err(StoreError::AlreadyExists(id)) if id == acct()));
    }

    #[tokio::test]
    async fn test_update_patches_filtered_row_with_representation() {
        // Arrange
        let (store, stub) = serve_stub(StatusCode::OK, SAMPLE_ROW).await;

        // Act
        let stored = store.update_config(&sample()).await.unwrap();

        // Assert
        assert_eq!(stored, sample());
        let seen = only_request(&stub);
        assert_eq!(seen.method, Method::PATCH);
        assert_eq!(seen.target, "/rest/v1/account-config?account=eq.acct-1");
        assert_eq!(seen.prefer.as_deref(), Some("return=representation"));
        assert_eq!(seen.authorization.as_deref(), Some("Bearer service-key"));
    }

    #[tokio::test]
    async fn test_update_matching_no_rows_is_not_found() {
        let (store, _) = serve_stub(StatusCode::OK, "[]").await;

        let result = store.update_config(&sample()).await;

        assert!(matches!(result, Err(StoreError::NotFound(id)) if id == acct()));
    }

    #[tokio::test]
    async fn test_server_error_is_backend_with_status_and_body() {
        // Arrange
        let (store, _) = serve_stub(StatusCode::INTERNAL_SERVER_ERROR, "database is down").await;

        // Act
        let result = store.find_config(&acct()).await;

        // Assert
        match result {
            Err(StoreError::Backend(message)) => {
                assert!(message.contains("500"), "message: {message}");
                assert!(message.contains("database is down"), "message: {message}");
            }
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_conflict_insert_failure_is_backend() {
        let (store, _) = serve_stub(StatusCode::UNAUTHORIZED, "bad key").await;

        let result = store.insert_config(&sample()).await;

        assert!(matches!(
            result,
            Err(StoreError::Backend(m)) if m.contains("401") && m.contains("bad key")
        ));
    }

    #[tokio::test]
    async fn test_mismatched_row_is_invalid() {
        let (store, _) = serve_stub(StatusCode::OK, r#"[{"account":"someone-else"}]"#).await;

        let result = store.find_config(&acct()).await;

        assert!(matches!(result, Err(StoreError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_find_account_queries_accounts_by_uid() {
        // Arrange
        let (store, stub) = serve_stub(
            StatusCode::OK,
            r#"[{"uid":"acct-1","email":"owner@example.com","name":"Dana"}]"#,
        )
        .await;

        // Act
        let found = store.find_account(&acct()).await.unwrap();

        // Assert
        assert_eq!(
            found,
            Some(Account {
                uid: acct(),
                email: "owner@example.com".to_string(),
                name: Some("Dana".to_string()),
            })
        );
        assert_eq!(only_request(&stub).target, "/rest/v1/accounts?uid=eq.acct-1&select=*");
    }
}
