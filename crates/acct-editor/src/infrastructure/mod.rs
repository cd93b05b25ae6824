//! Infrastructure layer for acct-editor.
//!
//! Only the HTTP client lives here; the form state never sees `reqwest`.

pub mod http_client;

pub use http_client::HttpConfigClient;
