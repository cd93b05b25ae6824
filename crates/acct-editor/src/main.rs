//! Account configuration editor: command-line entry point.
//!
//! Opens one account's configuration form against a running `acct-api`,
//! applies the edits given on the command line, prints the form, and
//! optionally commits.
//!
//! # Usage
//!
//! ```text
//! acct-editor <UID> [OPTIONS]
//!
//! Options:
//!   --server <URL>        API base URL [default: http://127.0.0.1:3000]
//!   --url <URL>           Set the website URL
//!   --context <TEXT>      Set the context text
//!   --basis <ID>...       Replace the basis flags (support-context, upsell-context)
//!   --clear-basis         Clear every basis flag
//!   --check <ID>...       Check a QA item (appropriate-greeting, verified-caller, additional-help)
//!   --uncheck <ID>...     Uncheck a QA item
//!   --commit              Save the draft
//!   --timeout-secs <N>    Give up on any single request after N seconds
//! ```
//!
//! `--server` falls back to `ACCT_API_URL`.  Log verbosity follows
//! `RUST_LOG` (default `info`).
//!
//! # Flow
//!
//! ```text
//! main()
//!  └─ HttpConfigClient::fetch_account()   -- personal record (failure is a warning)
//!  └─ FormView::mount()                   -- subscribe, then poll the stored config
//!  └─ dispatch edits                      -- url, context, basis, check, uncheck
//!  └─ render                              -- print the form
//!  └─ dispatch Commit (optional)          -- wait for the save
//!  └─ drain notifications                 -- print; exit non-zero on any error
//! ```

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use acct_core::{AccountId, BasisOption, QaItem};
use acct_editor::application::FormState;
use acct_editor::domain::{NotificationQueue, NotificationStatus};
use acct_editor::infrastructure::HttpConfigClient;
use acct_editor::presentation::{FormEvent, FormView};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Edit one account's configuration.
#[derive(Debug, Parser)]
#[command(
    name = "acct-editor",
    about = "Edit and save one account's configuration",
    version
)]
struct Cli {
    /// Account identifier.
    uid: String,

    /// Base URL of the account config API.
    #[arg(long, default_value = "http://127.0.0.1:3000", env = "ACCT_API_URL")]
    server: String,

    /// New website URL.
    #[arg(long)]
    url: Option<String>,

    /// New context text.
    #[arg(long)]
    context: Option<String>,

    /// Basis flags to set; replaces the current set.
    #[arg(long, num_args = 1..)]
    basis: Vec<BasisOption>,

    /// Clear every basis flag.
    #[arg(long, conflicts_with = "basis")]
    clear_basis: bool,

    /// QA items to check.
    #[arg(long, num_args = 1..)]
    check: Vec<QaItem>,

    /// QA items to uncheck.
    #[arg(long, num_args = 1..)]
    uncheck: Vec<QaItem>,

    /// Save the draft after applying the edits.
    #[arg(long)]
    commit: bool,

    /// Per-request time limit in seconds; unlimited when omitted.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl Cli {
    /// The edits requested on the command line, as form events.
    fn edit_events(&self) -> Vec<FormEvent> {
        let mut events = Vec::new();
        if let Some(url) = &self.url {
            events.push(FormEvent::UrlChanged(url.clone()));
        }
        if let Some(context) = &self.context {
            events.push(FormEvent::ContextChanged(context.clone()));
        }
        if self.clear_basis || !self.basis.is_empty() {
            let basis: BTreeSet<BasisOption> = self.basis.iter().copied().collect();
            events.push(FormEvent::BasisChanged(basis));
        }
        for &item in &self.check {
            events.push(FormEvent::QaToggled { item, checked: true });
        }
        for &item in &self.uncheck {
            events.push(FormEvent::QaToggled { item, checked: false });
        }
        events
    }

    fn time_limit(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let limit = cli.time_limit();
    let account_id = AccountId::parse(&cli.uid).context("invalid account id")?;
    let client = Arc::new(
        HttpConfigClient::new(&cli.server)
            .with_context(|| format!("cannot use server '{}'", cli.server))?,
    );

    info!("editing account {account_id} via {}", cli.server);

    let account = match with_limit(limit, "profile request", client.fetch_account(&account_id))
        .await
        .and_then(|result| result.map_err(anyhow::Error::from))
    {
        Ok(account) => account,
        Err(e) => {
            warn!("could not load personal record for {account_id}: {e:#}");
            None
        }
    };

    let queue = Arc::new(NotificationQueue::new());
    let state = FormState::new(account_id, client, queue.clone());
    let (mut view, poll) = FormView::mount(state);
    if let Some(account) = account {
        view = view.with_account(account);
    }
    if let Some(poll) = poll {
        join(limit, "load", poll).await?;
    }

    for event in cli.edit_events() {
        view.dispatch(event);
    }

    println!("{}", view.render());

    if cli.commit {
        if let Some(save) = view.dispatch(FormEvent::Commit) {
            join(limit, "save", save).await?;
        }
    }

    let notifications = queue.drain();
    for notification in &notifications {
        println!("{notification}");
    }
    view.unmount();

    if notifications
        .iter()
        .any(|n| n.status == NotificationStatus::Error)
    {
        bail!("one or more requests failed");
    }
    Ok(())
}

/// Awaits `fut`, failing after `limit` when one is set.
async fn with_limit<F: Future>(
    limit: Option<Duration>,
    what: &str,
    fut: F,
) -> anyhow::Result<F::Output> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .with_context(|| format!("{what} timed out after {}s", limit.as_secs())),
        None => Ok(fut.await),
    }
}

/// Waits for a background form task.
async fn join(limit: Option<Duration>, what: &str, task: JoinHandle<()>) -> anyhow::Result<()> {
    with_limit(limit, what, task)
        .await?
        .with_context(|| format!("{what} task failed"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
