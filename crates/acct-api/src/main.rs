//! Account configuration API: entry point.
//!
//! Serves the fetch-config and save-config endpoints used by the editor,
//! backed by an in-memory store, a TOML file, or a hosted Supabase database.
//!
//! # Usage
//!
//! ```text
//! acct-api [OPTIONS]
//!
//! Options:
//!   --bind <IP>             Listener address [default: 127.0.0.1]
//!   --port <PORT>           Listener port [default: 3000]
//!   --store <KIND>          memory | file | supabase [default: memory]
//!   --store-path <PATH>     TOML file for the file store [default: account-config.toml]
//!   --supabase-url <URL>    Hosted store base URL (supabase store)
//!   --supabase-key <KEY>    Hosted store service key (supabase store)
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable              | Flag             |
//! |-----------------------|------------------|
//! | `ACCT_API_BIND`       | `--bind`         |
//! | `ACCT_API_PORT`       | `--port`         |
//! | `ACCT_API_STORE`      | `--store`        |
//! | `ACCT_API_STORE_PATH` | `--store-path`   |
//! | `SUPABASE_URL`        | `--supabase-url` |
//! | `SUPABASE_KEY`        | `--supabase-key` |
//!
//! CLI args take precedence when both are present.  Log verbosity follows
//! `RUST_LOG` (default `info`).

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use acct_api::domain::{ApiConfig, StoreSettings};
use acct_api::infrastructure::run_server;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Store backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    Memory,
    File,
    Supabase,
}

/// HTTP service for per-account configuration.
#[derive(Debug, Parser)]
#[command(
    name = "acct-api",
    about = "HTTP service for fetching and upserting per-account configuration",
    version
)]
struct Cli {
    /// IP address to bind the HTTP listener to.
    #[arg(long, default_value = "127.0.0.1", env = "ACCT_API_BIND")]
    bind: String,

    /// TCP port for the HTTP listener.
    #[arg(long, default_value_t = 3000, env = "ACCT_API_PORT")]
    port: u16,

    /// Which store holds the records.
    #[arg(long, value_enum, default_value_t = StoreKind::Memory, env = "ACCT_API_STORE")]
    store: StoreKind,

    /// Path of the TOML document used by the file store.
    #[arg(long, default_value = "account-config.toml", env = "ACCT_API_STORE_PATH")]
    store_path: PathBuf,

    /// Base URL of the hosted store, e.g. `https://xyz.supabase.co`.
    #[arg(long, env = "SUPABASE_URL")]
    supabase_url: Option<String>,

    /// Service key for the hosted store.
    #[arg(long, env = "SUPABASE_KEY", hide_env_values = true)]
    supabase_key: Option<String>,
}

impl Cli {
    /// Converts the parsed CLI arguments into an [`ApiConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--bind` is not a valid IP address, or if the
    /// Supabase store is selected without both its URL and key.
    fn into_api_config(self) -> anyhow::Result<ApiConfig> {
        let bind_addr: SocketAddr = format!("{}:{}", self.bind, self.port)
            .parse()
            .with_context(|| format!("invalid bind address: '{}:{}'", self.bind, self.port))?;

        let store = match self.store {
            StoreKind::Memory => StoreSettings::Memory,
            StoreKind::File => StoreSettings::File {
                path: self.store_path,
            },
            StoreKind::Supabase => {
                let (Some(url), Some(api_key)) = (self.supabase_url, self.supabase_key) else {
                    bail!("the supabase store needs both --supabase-url and --supabase-key");
                };
                StoreSettings::Supabase { url, api_key }
            }
        };

        Ok(ApiConfig { bind_addr, store })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_api_config()?;

    info!(
        "account config API starting: bind={}, store={}",
        config.bind_addr,
        store_label(&config.store)
    );

    run_server(config, shutdown_signal()).await?;

    info!("account config API stopped");
    Ok(())
}

/// Resolves on Ctrl+C.  If the signal handler cannot be installed the
/// server runs until killed.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl+C, initiating graceful shutdown"),
        Err(e) => {
            tracing::error!("failed to listen for Ctrl+C signal: {e}");
            std::future::pending::<()>().await;
        }
    }
}

/// Store description for the startup log line; never includes the key.
fn store_label(store: &StoreSettings) -> String {
    match store {
        StoreSettings::Memory => "memory".to_string(),
        StoreSettings::File { path } => format!("file:{}", path.display()),
        StoreSettings::Supabase { url, .. } => format!("supabase:{url}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
