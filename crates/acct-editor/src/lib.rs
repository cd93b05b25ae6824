//! acct-editor library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does acct-editor do?
//!
//! It is the operator-facing side of the account configuration service.
//! An operator opens one account, the editor fetches whatever is stored for
//! it, the operator edits the URL, context, basis flags and QA checklist,
//! and a commit sends the whole draft back to the API.
//!
//! - **`domain`** – Notifications: the user-facing status messages and the
//!   [`domain::Notifier`] port that delivers them.
//! - **`application`** – [`application::FormState`]: the single draft, its
//!   named actions, and the observer registry.
//! - **`presentation`** – The toggle widget and the form view that binds the
//!   draft to it.
//! - **`infrastructure`** – [`infrastructure::HttpConfigClient`], the
//!   `reqwest` adapter for the API.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
