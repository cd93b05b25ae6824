//! Application layer for acct-editor.
//!
//! [`FormState`] owns the draft and every rule about how it changes.  It
//! reaches the API only through the [`ConfigClient`] port and reports
//! outcomes only through the injected [`crate::domain::Notifier`], so it
//! runs unchanged against the HTTP adapter, a mock, or a scripted double.
//!
//! # What does NOT belong here?
//!
//! - HTTP requests or JSON (infrastructure)
//! - Widgets and text rendering (presentation)

pub mod config_client;
pub mod form_state;

pub use config_client::{ClientError, ConfigClient};
pub use form_state::{FormAction, FormState, Subscription};
