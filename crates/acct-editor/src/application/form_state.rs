//! FormState: the reactive draft behind the account configuration form.
//!
//! One `FormState` holds one [`AccountConfig`] draft for one account.  It is
//! changed only through the closed set of [`FormAction`]s (or the named
//! methods that wrap them), by a one-shot [`FormState::poll`] of the stored
//! record, and it is read through [`FormState::snapshot`] or by subscribing.
//!
//! # Notification contract
//!
//! Every mutation produces exactly one notification round: each subscribed
//! observer is called once with the full draft.  Observers run after the
//! internal lock is released, so an observer may call `snapshot()` or even
//! dispatch another action.
//!
//! Rounds never interleave.  The first caller to find no round in progress
//! becomes the deliverer and keeps delivering until no mutation is pending;
//! a mutation made meanwhile (by an observer, or by another thread) only
//! queues a round for it.  Every round carries the draft as it is when the
//! round starts, so the last notification an observer receives is always
//! the current draft.  Without re-entrancy or contention the round
//! completes before the mutating call returns.
//!
//! # Poll versus local edits
//!
//! Each action bumps an edit sequence number.  `poll` remembers the number
//! current when it was issued.  When the fetch completes, the stored record
//! is applied only if the number is unchanged; otherwise the operator has
//! typed something meanwhile, the stored record is dropped, and a `Warn`
//! notification says so.
//!
//! ```text
//!  poll() ──► seq = 4 ──► fetch … ──► seq still 4? ── yes ──► overwrite + observers
//!                                          │
//!                                          └── no ──► keep draft, Warn
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use acct_core::{AccountConfig, AccountId, BasisOption, QaItem};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::config_client::ConfigClient;
use crate::domain::{Notification, NotificationStatus, Notifier};

type Observer = Arc<dyn Fn(&AccountConfig) + Send + Sync>;

/// An operator edit.  This is the complete set of ways the draft can be
/// changed from outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    SetUrl(String),
    SetContext(String),
    SetBasis(BTreeSet<BasisOption>),
    SetQa(BTreeSet<QaItem>),
    /// Checks (`checked == true`) or unchecks one checklist item.
    UpdateQa { item: QaItem, checked: bool },
}

impl FormAction {
    fn apply_to(self, draft: &mut AccountConfig) {
        match self {
            FormAction::SetUrl(url) => draft.url = url,
            FormAction::SetContext(context) => draft.context = context,
            FormAction::SetBasis(basis) => draft.basis = basis,
            FormAction::SetQa(qa) => draft.qa = qa,
            FormAction::UpdateQa { item, checked } => {
                if checked {
                    draft.qa.insert(item);
                } else {
                    draft.qa.remove(&item);
                }
            }
        }
    }
}

struct Inner {
    draft: AccountConfig,
    observers: BTreeMap<u64, Observer>,
    next_observer_id: u64,
    edit_seq: u64,
    polled: bool,
    /// A caller is running notification rounds.
    delivering: bool,
    /// Mutations whose round has not started yet.
    pending_rounds: usize,
}

/// Clears `delivering` if an observer panics mid-round, so later mutations
/// still get delivered.
struct DeliveryGuard<'a> {
    state: &'a Mutex<Inner>,
    armed: bool,
}

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut inner = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            inner.delivering = false;
            inner.pending_rounds = 0;
        }
    }
}

/// Shared handle to one account's draft.  Clones refer to the same state.
#[derive(Clone)]
pub struct FormState {
    inner: Arc<Mutex<Inner>>,
    client: Arc<dyn ConfigClient>,
    notifier: Arc<dyn Notifier>,
}

/// Registration returned by [`FormState::subscribe`].
///
/// Dropping it without calling [`Subscription::unsubscribe`] leaves the
/// observer registered for the life of the state.
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    id: u64,
    state: Weak<Mutex<Inner>>,
}

impl Subscription {
    /// Removes this observer.  Other observers are unaffected; the removed
    /// one is not called for any later mutation.
    pub fn unsubscribe(self) {
        if let Some(state) = self.state.upgrade() {
            state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .observers
                .remove(&self.id);
        }
    }
}

impl FormState {
    /// Creates an empty draft for `account_id`.
    pub fn new(
        account_id: AccountId,
        client: Arc<dyn ConfigClient>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                draft: AccountConfig::new(account_id),
                observers: BTreeMap::new(),
                next_observer_id: 0,
                edit_seq: 0,
                polled: false,
                delivering: false,
                pending_rounds: 0,
            })),
            client,
            notifier,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn account_id(&self) -> AccountId {
        self.lock().draft.account_id().clone()
    }

    /// Returns a copy of the current draft.
    pub fn snapshot(&self) -> AccountConfig {
        self.lock().draft.clone()
    }

    // ── Actions ───────────────────────────────────────────────────────────────

    /// Applies one operator edit and notifies observers.
    pub fn apply(&self, action: FormAction) {
        debug!("form action {action:?}");
        self.mutate(|inner| {
            action.apply_to(&mut inner.draft);
            inner.edit_seq += 1;
        });
    }

    pub fn set_url(&self, url: impl Into<String>) {
        self.apply(FormAction::SetUrl(url.into()));
    }

    pub fn set_context(&self, context: impl Into<String>) {
        self.apply(FormAction::SetContext(context.into()));
    }

    pub fn set_basis(&self, basis: BTreeSet<BasisOption>) {
        self.apply(FormAction::SetBasis(basis));
    }

    pub fn set_qa(&self, qa: BTreeSet<QaItem>) {
        self.apply(FormAction::SetQa(qa));
    }

    /// Checks or unchecks `item`.  Idempotent.
    pub fn update_qa(&self, item: QaItem, checked: bool) {
        self.apply(FormAction::UpdateQa { item, checked });
    }

    // ── Observers ─────────────────────────────────────────────────────────────

    /// Registers `observer` to be called with the full draft after every
    /// mutation.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&AccountConfig) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let id = inner.next_observer_id;
        inner.next_observer_id += 1;
        inner.observers.insert(id, Arc::new(observer));
        Subscription {
            id,
            state: Arc::downgrade(&self.inner),
        }
    }

    fn mutate(&self, change: impl FnOnce(&mut Inner)) {
        self.mutate_if(|inner| {
            change(inner);
            true
        });
    }

    /// Runs `change` under the lock; if it returns `true`, queues one
    /// notification round and delivers pending rounds unless another caller
    /// already is.
    fn mutate_if(&self, change: impl FnOnce(&mut Inner) -> bool) -> bool {
        {
            let mut inner = self.lock();
            if !change(&mut *inner) {
                return false;
            }
            inner.pending_rounds += 1;
            if inner.delivering {
                return true;
            }
            inner.delivering = true;
        }
        self.deliver_pending();
        true
    }

    fn deliver_pending(&self) {
        let mut guard = DeliveryGuard {
            state: &self.inner,
            armed: true,
        };
        loop {
            let (draft, observers) = {
                let mut inner = self.lock();
                if inner.pending_rounds == 0 {
                    // Cleared under the same lock that saw nothing pending,
                    // so a concurrent mutation either sees `delivering` or
                    // is picked up here.
                    inner.delivering = false;
                    guard.armed = false;
                    return;
                }
                inner.pending_rounds -= 1;
                let observers: Vec<Observer> = inner.observers.values().cloned().collect();
                (inner.draft.clone(), observers)
            };
            for observer in observers {
                observer(&draft);
            }
        }
    }

    // ── Remote operations ─────────────────────────────────────────────────────

    /// Fetches the stored configuration in the background and, if one
    /// exists, overwrites the four editable fields with it.
    ///
    /// Runs at most once per state; later calls return `None` and do
    /// nothing.  Must be called from within a tokio runtime.
    pub fn poll(&self) -> Option<JoinHandle<()>> {
        let (account_id, issued_at) = {
            let mut inner = self.lock();
            if inner.polled {
                debug!("poll already issued for {}", inner.draft.account_id());
                return None;
            }
            inner.polled = true;
            (inner.draft.account_id().clone(), inner.edit_seq)
        };

        let state = self.clone();
        Some(tokio::spawn(async move {
            match state.client.fetch_config(&account_id).await {
                Ok(Some(stored)) => state.apply_stored(&stored, issued_at),
                Ok(None) => info!("no stored configuration for {account_id}"),
                Err(e) => {
                    error!("failed to load configuration for {account_id}: {e}");
                    state.notifier.notify(Notification::new(
                        NotificationStatus::Error,
                        "Account",
                        format!("Could not load account configuration: {e}"),
                    ));
                }
            }
        }))
    }

    fn apply_stored(&self, stored: &AccountConfig, issued_at: u64) {
        let applied = self.mutate_if(|inner| {
            if inner.edit_seq != issued_at {
                return false;
            }
            inner.draft.overwrite_fields_from(stored);
            true
        });

        if applied {
            info!("loaded stored configuration for {}", stored.account_id());
        } else {
            warn!(
                "discarding stored configuration for {}: draft edited while loading",
                stored.account_id()
            );
            self.notifier.notify(Notification::new(
                NotificationStatus::Warn,
                "Stored configuration not applied",
                "The form was edited while loading; local edits were kept",
            ));
        }
    }

    /// Sends a snapshot of the draft to the store in the background.
    ///
    /// Returns at once.  The `Ok` notification is emitted only after the
    /// save succeeds; a failed save emits an `Error` notification instead.
    /// Must be called from within a tokio runtime.
    pub fn commit(&self) -> JoinHandle<()> {
        let draft = self.snapshot();
        let client = Arc::clone(&self.client);
        let notifier = Arc::clone(&self.notifier);

        tokio::spawn(async move {
            let account_id = draft.account_id().clone();
            match client.save_config(&draft).await {
                Ok(_) => {
                    info!("saved configuration for {account_id}");
                    notifier.notify(Notification::config_saved());
                }
                Err(e) => {
                    error!("failed to save configuration for {account_id}: {e}");
                    notifier.notify(Notification::new(
                        NotificationStatus::Error,
                        "Account",
                        format!("Could not save account configuration: {e}"),
                    ));
                }
            }
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
