//! End-to-end tests: the editor's form state and HTTP client against a real
//! `acct-api` router served on a loopback port.

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Arc;

use acct_api::application::ConfigService;
use acct_api::infrastructure::router;
use acct_api::infrastructure::store::MemoryStore;
use acct_core::{Account, AccountConfig, AccountId, BasisOption, QaItem};
use acct_editor::application::{ConfigClient, FormState};
use acct_editor::domain::{Notification, NotificationQueue, NotificationStatus};
use acct_editor::infrastructure::HttpConfigClient;
use acct_editor::presentation::{FormEvent, FormView};
use tokio::net::TcpListener;

/// Serves the API on an ephemeral port and returns its base URL.
async fn serve(store: MemoryStore) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let app = router(ConfigService::new(Arc::new(store)));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn acct(raw: &str) -> AccountId {
    AccountId::parse(raw).unwrap()
}

fn open_state(server: &str, uid: &str) -> (FormState, Arc<NotificationQueue>) {
    let client = Arc::new(HttpConfigClient::new(server).unwrap());
    let queue = Arc::new(NotificationQueue::new());
    (FormState::new(acct(uid), client, queue.clone()), queue)
}

#[tokio::test]
async fn test_edit_commit_and_reload() {
    // Arrange
    let server = serve(MemoryStore::new()).await;
    let (state, queue) = open_state(&server, "acct-1");
    let (view, poll) = FormView::mount(state);
    poll.unwrap().await.unwrap();

    // Act: edit every field, then commit
    view.dispatch(FormEvent::UrlChanged("https://example.com".to_string()));
    view.dispatch(FormEvent::ContextChanged("we sell widgets".to_string()));
    view.dispatch(FormEvent::BasisChanged(BTreeSet::from([BasisOption::SupportContext])));
    view.click_qa(QaItem::VerifiedCaller);
    view.dispatch(FormEvent::Commit).unwrap().await.unwrap();

    // Assert: saved, and a fresh form for the same account loads the values
    assert_eq!(queue.drain(), vec![Notification::config_saved()]);
    let (reopened, _) = open_state(&server, "acct-1");
    let (reloaded, poll) = FormView::mount(reopened);
    poll.unwrap().await.unwrap();
    let model = reloaded.model();
    assert_eq!(model.url, "https://example.com");
    assert_eq!(model.context, "we sell widgets");
    assert_eq!(model.basis, BTreeSet::from([BasisOption::SupportContext]));
    assert_eq!(model.qa, BTreeSet::from([QaItem::VerifiedCaller]));
    assert_eq!(reloaded.render_count(), 1);
}

#[tokio::test]
async fn test_second_commit_overwrites_first() {
    // Arrange
    let server = serve(MemoryStore::new()).await;
    let (state, _) = open_state(&server, "acct-2");
    state.poll().unwrap().await.unwrap();

    // Act
    state.set_url("first");
    state.commit().await.unwrap();
    state.set_url("second");
    state.update_qa(QaItem::AdditionalHelp, true);
    state.commit().await.unwrap();

    // Assert
    let client = HttpConfigClient::new(&server).unwrap();
    let stored = client.fetch_config(&acct("acct-2")).await.unwrap().unwrap();
    let mut expected = AccountConfig::new(acct("acct-2"));
    expected.url = "second".to_string();
    expected.qa.insert(QaItem::AdditionalHelp);
    assert_eq!(stored, expected);
}

#[tokio::test]
async fn test_unconfigured_account_fetches_none() {
    let server = serve(MemoryStore::new()).await;
    let client = HttpConfigClient::new(&server).unwrap();

    let fetched = client.fetch_config(&acct("nobody")).await.unwrap();

    assert!(fetched.is_none());
}

#[tokio::test]
async fn test_fetch_account_returns_profile() {
    // Arrange
    let owner = Account {
        uid: acct("acct-3"),
        email: "owner@example.com".to_string(),
        name: Some("Dana".to_string()),
    };
    let server = serve(MemoryStore::with_accounts([owner.clone()])).await;
    let client = HttpConfigClient::new(&server).unwrap();

    // Act
    let found = client.fetch_account(&acct("acct-3")).await.unwrap();
    let missing = client.fetch_account(&acct("acct-4")).await.unwrap();

    // Assert
    assert_eq!(found, Some(owner));
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_unreachable_server_reports_error_notifications() {
    // Arrange: take a free port, then close it so nothing is listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let (state, queue) = open_state(&format!("http://{addr}"), "acct-1");
    state.set_url("kept");

    // Act
    state.poll().unwrap().await.unwrap();
    state.commit().await.unwrap();

    // Assert: one error per failed request, draft untouched, no Ok
    let notes = queue.drain();
    assert_eq!(notes.len(), 2);
    assert!(notes.iter().all(|n| n.status == NotificationStatus::Error));
    assert_eq!(state.snapshot().url, "kept");
}
