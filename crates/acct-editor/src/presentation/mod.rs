//! Presentation layer for acct-editor.
//!
//! Framework-free widgets: each one exposes the state a renderer needs
//! (visual state, icon, background, label) plus `click()`, and renders to
//! plain text for the CLI.  Widgets never touch the draft directly; the
//! form view routes every interaction through one named form action.

pub mod check_button;
pub mod form_view;

pub use check_button::{CheckButton, VisualState};
pub use form_view::{FormEvent, FormView};
