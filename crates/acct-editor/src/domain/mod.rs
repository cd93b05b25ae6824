//! Domain layer for acct-editor.
//!
//! Pure types with no I/O.  The editable record itself lives in
//! `acct-core`; this layer only adds the editor's notification model.

pub mod notification;

pub use notification::{Notification, NotificationQueue, NotificationStatus, Notifier};
