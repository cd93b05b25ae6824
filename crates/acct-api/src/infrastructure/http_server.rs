//! HTTP server: routes, handlers and error mapping.
//!
//! ```text
//! GET  /api/accounts/config/:uid     fetch-config
//! POST /api/accounts/config          save-config (upsert)
//! GET  /api/accounts/profile/:uid    account profile
//! GET  /health                       liveness probe
//! ```
//!
//! Handlers are thin: parse and validate the input, call [`ConfigService`],
//! wrap the result in the wire type.  Failures become an [`ApiError`], which
//! logs itself and renders as `{"error": "..."}` with a matching status.

use std::future::Future;

use acct_core::protocol::{
    AccountRecord, AccountResponse, ConfigRecord, ErrorResponse, FetchConfigResponse,
    SaveConfigRequest, SaveConfigResponse,
};
use acct_core::{AccountConfig, AccountId, SchemaError};
use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::application::{ConfigService, StoreError};
use crate::domain::ApiConfig;
use crate::infrastructure::store::open_store;

// ── Error mapping ─────────────────────────────────────────────────────────────

/// Failure of a single request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request carried an invalid account id or tag.
    #[error(transparent)]
    BadRequest(#[from] SchemaError),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {self}");
        } else {
            warn!("request rejected: {self}");
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Builds the application router around `service`.
///
/// Exposed separately from [`run_server`] so tests can drive it in-process.
pub fn router(service: ConfigService) -> Router {
    Router::new()
        .route("/api/accounts/config", post(save_config))
        .route("/api/accounts/config/:uid", get(fetch_config))
        .route("/api/accounts/profile/:uid", get(fetch_account))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Binds `config.bind_addr` and serves until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn run_server<F>(config: ApiConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let service = ConfigService::new(open_store(&config.store));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {}", config.bind_addr))?;

    info!("account config API listening on {}", config.bind_addr);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    Ok(())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn health() -> &'static str {
    "ok"
}

async fn fetch_config(
    State(service): State<ConfigService>,
    Path(uid): Path<String>,
) -> Result<Json<FetchConfigResponse>, ApiError> {
    info!("get account config {uid}");
    let account_id = AccountId::parse(&uid)?;

    let config = service.fetch_config(&account_id).await?;

    Ok(Json(FetchConfigResponse {
        config: config.as_ref().map(ConfigRecord::from),
    }))
}

async fn save_config(
    State(service): State<ConfigService>,
    Json(request): Json<SaveConfigRequest>,
) -> Result<Json<SaveConfigResponse>, ApiError> {
    info!("save account config {}", request.uid);
    let config = AccountConfig::try_from(request)?;

    let stored = service.save_config(&config).await?;

    Ok(Json(SaveConfigResponse {
        config: ConfigRecord::from(&stored),
    }))
}

async fn fetch_account(
    State(service): State<ConfigService>,
    Path(uid): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    info!("get account profile {uid}");
    let account_id = AccountId::parse(&uid)?;

    let account = service.fetch_account(&account_id).await?;

    Ok(Json(AccountResponse {
        account: account.as_ref().map(AccountRecord::from),
    }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
