//! User-facing status notifications.
//!
//! The form state reports outcomes (saved, fetch failed, stale poll result
//! discarded) through a [`Notifier`] handed to it at construction.  The
//! binary and the tests use [`NotificationQueue`] and read it back with
//! [`NotificationQueue::drain`].

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStatus {
    Ok,
    Warn,
    Error,
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotificationStatus::Ok => "ok",
            NotificationStatus::Warn => "warn",
            NotificationStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// One message for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub status: NotificationStatus,
    pub headline: String,
    pub text: String,
}

impl Notification {
    pub fn new(status: NotificationStatus, headline: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            status,
            headline: headline.into(),
            text: text.into(),
        }
    }

    /// Shown after a successful commit.
    pub fn config_saved() -> Self {
        Self::new(NotificationStatus::Ok, "Account", "Updated Account Configuration")
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.headline, self.text)
    }
}

/// Delivers notifications to the operator.
///
/// Called from spawned tasks, so implementations must be thread-safe.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// In-process FIFO notifier.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: Mutex<VecDeque<Notification>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every queued notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: Notification) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(notification);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
