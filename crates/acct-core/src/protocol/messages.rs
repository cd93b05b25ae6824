//! Request and response bodies for the account configuration endpoints.
//!
//! ```text
//! GET  /api/accounts/config/:uid    → FetchConfigResponse  {"config": {...} | null}
//! POST /api/accounts/config         ← SaveConfigRequest    {"uid": "...", "url": ..., ...}
//!                                   → SaveConfigResponse   {"config": {...}}
//! GET  /api/accounts/profile/:uid   → AccountResponse      {"account": {...} | null}
//! any failure                       → ErrorResponse        {"error": "..."}
//! ```
//!
//! Nullable or missing `url`/`context`/`basis`/`qa` columns deserialize to
//! their empty values; unknown extra fields (row ids, timestamps) are
//! ignored.

use serde::{Deserialize, Deserializer, Serialize};

/// One row of the `account-config` table as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    /// Account identifier (the table's unique key).
    pub account: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub context: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub basis: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub qa: Vec<String>,
}

/// Body of `GET /api/accounts/config/:uid`.
///
/// `config` is `null` when the account has never been configured; that is
/// a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfigResponse {
    pub config: Option<ConfigRecord>,
}

/// Body of `POST /api/accounts/config`: the complete draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveConfigRequest {
    pub uid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub context: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub basis: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub qa: Vec<String>,
}

/// Response to a successful save; echoes the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveConfigResponse {
    pub config: ConfigRecord,
}

/// One row of the `accounts` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub uid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Body of `GET /api/accounts/profile/:uid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub account: Option<AccountRecord>,
}

/// Body returned with every non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Treats an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
