//! Service configuration types.
//!
//! [`ApiConfig`] holds every runtime setting.  `main.rs` fills it from CLI
//! arguments and environment variables; tests build it directly.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Which store backs the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSettings {
    /// Volatile in-process store.  Lost on restart; used for development
    /// and tests.
    Memory,

    /// TOML document on local disk.
    File { path: PathBuf },

    /// Hosted PostgREST database (Supabase).
    Supabase {
        /// Project base URL, e.g. `https://xyzcompany.supabase.co`.
        url: String,
        /// Service key sent as both `apikey` and bearer token.
        api_key: String,
    },
}

/// All runtime configuration for the API service.
///
/// # Example
///
/// ```rust
/// use acct_api::domain::{ApiConfig, StoreSettings};
///
/// let cfg = ApiConfig::default();
/// assert_eq!(cfg.bind_addr.port(), 3000);
/// assert_eq!(cfg.store, StoreSettings::Memory);
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    pub store: StoreSettings,
}

impl Default for ApiConfig {
    /// Loopback on port 3000 with the in-memory store.
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            store: StoreSettings::Memory,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
