//! The account configuration form.
//!
//! `FormView` binds a [`FormState`] to its inputs.  It keeps a local copy of
//! the draft (the model) that it replaces on every state notification, and
//! turns every input event into exactly one form action.
//!
//! ```text
//!  FormEvent ──► dispatch ──► FormState action ──► observers ──► model, render_count
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use acct_core::{Account, AccountConfig, BasisOption, QaItem};
use tokio::task::JoinHandle;

use super::check_button::CheckButton;
use crate::application::{FormAction, FormState, Subscription};

/// An input event raised by the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    UrlChanged(String),
    ContextChanged(String),
    BasisChanged(BTreeSet<BasisOption>),
    QaToggled { item: QaItem, checked: bool },
    Commit,
}

struct Model {
    draft: AccountConfig,
    renders: usize,
}

pub struct FormView {
    state: FormState,
    model: Arc<Mutex<Model>>,
    subscription: Subscription,
    account: Option<Account>,
}

fn dispatch_to(state: &FormState, event: FormEvent) -> Option<JoinHandle<()>> {
    match event {
        FormEvent::UrlChanged(url) => state.apply(FormAction::SetUrl(url)),
        FormEvent::ContextChanged(context) => state.apply(FormAction::SetContext(context)),
        FormEvent::BasisChanged(basis) => state.apply(FormAction::SetBasis(basis)),
        FormEvent::QaToggled { item, checked } => {
            state.apply(FormAction::UpdateQa { item, checked })
        }
        FormEvent::Commit => return Some(state.commit()),
    }
    None
}

impl FormView {
    /// Mounts the form on `state`.
    ///
    /// Seeds the model from the current draft, subscribes, and only then
    /// issues the poll, so the poll's notification always reaches the view.
    /// Returns the poll task handle (`None` if the state was already
    /// polled).  Must be called from within a tokio runtime.
    pub fn mount(state: FormState) -> (Self, Option<JoinHandle<()>>) {
        let model = Arc::new(Mutex::new(Model {
            draft: state.snapshot(),
            renders: 0,
        }));

        let sink = Arc::clone(&model);
        let subscription = state.subscribe(move |draft| {
            let mut model = sink.lock().unwrap_or_else(PoisonError::into_inner);
            model.draft = draft.clone();
            model.renders += 1;
        });

        let poll = state.poll();
        let view = Self {
            state,
            model,
            subscription,
            account: None,
        };
        (view, poll)
    }

    /// Attaches the read-only personal record shown under the form.
    pub fn with_account(mut self, account: Account) -> Self {
        self.account = Some(account);
        self
    }

    /// The draft as of the latest notification.
    pub fn model(&self) -> AccountConfig {
        self.model
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .draft
            .clone()
    }

    /// Number of notifications received since mount.
    pub fn render_count(&self) -> usize {
        self.model
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .renders
    }

    /// Routes one input event to its form action.  Returns the save task
    /// handle for [`FormEvent::Commit`], `None` otherwise.
    pub fn dispatch(&self, event: FormEvent) -> Option<JoinHandle<()>> {
        dispatch_to(&self.state, event)
    }

    /// One toggle per checklist item, in display order, followed by the
    /// "Add Option" button.
    pub fn check_buttons(&self) -> Vec<CheckButton> {
        let draft = self.model();
        let mut buttons: Vec<CheckButton> = QaItem::ALL
            .into_iter()
            .map(|item| {
                let state = self.state.clone();
                CheckButton::new(item.label(), draft.qa.contains(&item)).on_change(
                    move |checked| {
                        dispatch_to(&state, FormEvent::QaToggled { item, checked });
                    },
                )
            })
            .collect();
        // Adding custom checklist items is not supported; the button has no action.
        buttons.push(CheckButton::new("Add Option", false).add_mode());
        buttons
    }

    /// Clicks the toggle for `item`.
    pub fn click_qa(&self, item: QaItem) {
        let position = QaItem::ALL.iter().position(|candidate| *candidate == item);
        if let Some(button) = position.and_then(|i| self.check_buttons().into_iter().nth(i)) {
            button.click();
        }
    }

    /// Text projection of the form.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Stops listening to the state.
    pub fn unmount(self) {
        self.subscription.unsubscribe();
    }
}

impl fmt::Display for FormView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let draft = self.model();

        writeln!(f, "Account Configuration ({})", draft.account_id())?;
        writeln!(f)?;
        writeln!(f, "Options")?;
        writeln!(f, "  URL:     {}", draft.url)?;
        writeln!(f, "  Context: {}", draft.context)?;
        writeln!(f, "  Basis:")?;
        for option in BasisOption::ALL {
            let mark = if draft.basis.contains(&option) { "x" } else { " " };
            writeln!(f, "    [{mark}] {}", option.label())?;
        }
        writeln!(f)?;
        writeln!(f, "Quality Assurance")?;
        for button in self.check_buttons() {
            writeln!(f, "  {button}")?;
        }
        writeln!(f)?;
        writeln!(f, "[ Set Configuration ]")?;

        if let Some(account) = &self.account {
            writeln!(f)?;
            writeln!(f, "Personal Record")?;
            writeln!(f, "  UID:   {}", account.uid)?;
            writeln!(f, "  eMail: {}", account.email)?;
            writeln!(f, "  Name:  {}", account.display_name())?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use acct_core::AccountId;

    use crate::application::config_client::MockConfigClient;
    use crate::domain::{Notification, NotificationQueue};

    fn acct() -> AccountId {
        AccountId::parse("acct-1").unwrap()
    }

    fn stored() -> AccountConfig {
        let mut cfg = AccountConfig::new(acct());
        cfg.url = "https://example.com".to_string();
        cfg.qa.insert(QaItem::AppropriateGreeting);
        cfg
    }

    fn empty_client() -> MockConfigClient {
        let mut client = MockConfigClient::new();
        client.expect_fetch_config().returning(|_| Ok(None));
        client
    }

    fn mounted(client: MockConfigClient) -> (FormView, Option<JoinHandle<()>>, Arc<NotificationQueue>) {
        let queue = Arc::new(NotificationQueue::new());
        let state = FormState::new(acct(), Arc::new(client), queue.clone());
        let (view, poll) = FormView::mount(state);
        (view, poll, queue)
    }

    #[tokio::test]
    async fn test_mount_receives_poll_result() {
        // Arrange
        let mut client = MockConfigClient::new();
        client.expect_fetch_config().returning(|_| Ok(Some(stored())));

        // Act
        let (view, poll, _) = mounted(client);
        poll.unwrap().await.unwrap();

        // Assert
        assert_eq!(view.model(), stored());
        assert_eq!(view.render_count(), 1);
    }

    #[tokio::test]
    async fn test_each_event_is_one_action_and_one_render() {
        // Arrange
        let (view, poll, _) = mounted(empty_client());
        poll.unwrap().await.unwrap();

        // Act
        view.dispatch(FormEvent::UrlChanged("u".to_string()));
        view.dispatch(FormEvent::ContextChanged("c".to_string()));
        view.dispatch(FormEvent::BasisChanged(BTreeSet::from([BasisOption::SupportContext])));
        view.dispatch(FormEvent::QaToggled {
            item: QaItem::VerifiedCaller,
            checked: true,
        });

        // Assert
        assert_eq!(view.render_count(), 4);
        let model = view.model();
        assert_eq!(model.url, "u");
        assert_eq!(model.context, "c");
        assert_eq!(model.basis, BTreeSet::from([BasisOption::SupportContext]));
        assert_eq!(model.qa, BTreeSet::from([QaItem::VerifiedCaller]));
    }

    #[tokio::test]
    async fn test_commit_event_saves_and_notifies() {
        let mut client = empty_client();
        client.expect_save_config().times(1).returning(|cfg| Ok(cfg.clone()));
        let (view, poll, queue) = mounted(client);
        poll.unwrap().await.unwrap();

        let save = view.dispatch(FormEvent::Commit);
        save.unwrap().await.unwrap();

        assert_eq!(queue.drain(), vec![Notification::config_saved()]);
        assert_eq!(view.render_count(), 0);
    }

    #[tokio::test]
    async fn test_check_buttons_follow_model_and_end_with_add() {
        // Arrange
        let mut client = MockConfigClient::new();
        client.expect_fetch_config().returning(|_| Ok(Some(stored())));
        let (view, poll, _) = mounted(client);
        poll.unwrap().await.unwrap();

        // Act
        let buttons = view.check_buttons();

        // Assert
        assert_eq!(buttons.len(), QaItem::ALL.len() + 1);
        assert!(buttons[0].value());
        assert!(!buttons[1].value());
        assert!(!buttons[2].value());
        let add = buttons.last().unwrap();
        assert!(add.is_add_mode());
        assert_eq!(add.label(), "Add Option");
    }

    #[tokio::test]
    async fn test_click_qa_toggles_membership() {
        // Arrange
        let (view, poll, _) = mounted(empty_client());
        poll.unwrap().await.unwrap();

        // Act / Assert: off -> on -> off
        view.click_qa(QaItem::AdditionalHelp);
        assert!(view.model().qa.contains(&QaItem::AdditionalHelp));
        view.click_qa(QaItem::AdditionalHelp);
        assert!(!view.model().qa.contains(&QaItem::AdditionalHelp));
        assert_eq!(view.render_count(), 2);
    }

    #[tokio::test]
    async fn test_add_button_click_changes_nothing() {
        let (view, poll, _) = mounted(empty_client());
        poll.unwrap().await.unwrap();

        view.check_buttons().last().unwrap().click();

        assert_eq!(view.render_count(), 0);
        assert!(view.model().qa.is_empty());
    }

    #[tokio::test]
    async fn test_render_shows_sections_and_personal_record() {
        // Arrange
        let mut client = MockConfigClient::new();
        client.expect_fetch_config().returning(|_| Ok(Some(stored())));
        let (view, poll, _) = mounted(client);
        poll.unwrap().await.unwrap();
        let view = view.with_account(Account {
            uid: acct(),
            email: "owner@example.com".to_string(),
            name: None,
        });

        // Act
        let text = view.render();

        // Assert
        assert!(text.contains("URL:     https://example.com"));
        assert!(text.contains("[ ] Offer support based on Context"));
        assert!(text.contains("[x] Agent used appropriate greeting"));
        assert!(text.contains("[+] Add Option"));
        assert!(text.contains("[ Set Configuration ]"));
        assert!(text.contains("eMail: owner@example.com"));
        assert!(text.contains("Name:  (unknown)"));
    }

    #[tokio::test]
    async fn test_render_lays_out_full_form() {
        // Arrange
        let mut client = MockConfigClient::new();
        client.expect_fetch_config().returning(|_| Ok(Some(stored())));
        let (view, poll, _) = mounted(client);
        poll.unwrap().await.unwrap();

        // Act
        let text = view.render();

        // Assert
        let expected = [
            "Account Configuration (acct-1)",
            "",
            "Options",
            "  URL:     https://example.com",
            "  Context: ",
            "  Basis:",
            "    [ ] Offer support based on Context",
            "    [ ] Offer upsell based on Context",
            "",
            "Quality Assurance",
            "  [x] Agent used appropriate greeting",
            "  [ ] Agent verified caller before entering account",
            "  [ ] Agent asked if any additional help was needed",
            "  [+] Add Option",
            "",
            "[ Set Configuration ]",
            "",
        ]
        .join("\n");
        assert_eq!(text, expected);
        assert_eq!(view.to_string(), text);
    }

    #[tokio::test]
    async fn test_render_without_account_omits_personal_record() {
        let (view, poll, _) = mounted(empty_client());
        poll.unwrap().await.unwrap();

        assert!(!view.render().contains("Personal Record"));
    }

    #[tokio::test]
    async fn test_unmount_stops_updates() {
        // Arrange
        let queue = Arc::new(NotificationQueue::new());
        let state = FormState::new(acct(), Arc::new(empty_client()), queue);
        let (view, poll) = FormView::mount(state.clone());
        poll.unwrap().await.unwrap();
        let model = Arc::clone(&view.model);

        // Act
        view.unmount();
        state.set_url("after unmount");

        // Assert
        let model = model.lock().unwrap();
        assert_eq!(model.renders, 0);
        assert!(model.draft.url.is_empty());
    }
}
