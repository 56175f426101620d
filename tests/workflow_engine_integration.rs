//! End-to-end tests for [`WorkflowEngine`] over the in-memory adapters.
//!
//! These tests drive the engine the way a caller would: refresh, pick an
//! action, run the workflow, then refresh again and check the new state.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use std::sync::Arc;

use eyre::{WrapErr, ensure, eyre};
use mockable::DefaultClock;
use workbridge::config::WorkflowSettings;
use workbridge::workflow::{
    WorkflowEngine,
    adapters::memory::{
        InMemoryCodeReview, InMemoryIssueTracker, InMemoryVersionControl, ScriptedDiffSummarizer,
        VersionControlOperation,
    },
    domain::{Action, BranchName, Ticket, resolve_actions},
    services::WorkflowWarning,
};

type MemoryEngine = WorkflowEngine<
    InMemoryIssueTracker,
    InMemoryVersionControl,
    InMemoryCodeReview,
    DefaultClock,
>;

struct Setup {
    tracker: Arc<InMemoryIssueTracker>,
    vcs: Arc<InMemoryVersionControl>,
    review: Arc<InMemoryCodeReview>,
    engine: MemoryEngine,
}

fn branch(name: &str) -> BranchName {
    BranchName::new(name).expect("valid branch name")
}

fn setup(tickets: Vec<Ticket>) -> eyre::Result<Setup> {
    let tracker = Arc::new(InMemoryIssueTracker::new("https://tracker.example"));
    tracker.set_tickets(tickets)?;
    let vcs = Arc::new(InMemoryVersionControl::on_branch(branch("develop")));
    vcs.add_local_branch(branch("main"))?;
    let review = Arc::new(InMemoryCodeReview::new("https://review.example"));
    let engine = WorkflowEngine::new(
        WorkflowSettings::default(),
        Arc::clone(&tracker),
        Arc::clone(&vcs),
        Arc::clone(&review),
        Arc::new(DefaultClock),
    )?;
    Ok(Setup {
        tracker,
        vcs,
        review,
        engine,
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn create_branch_then_refresh_offers_pull_request() -> eyre::Result<()> {
    let ticket = Ticket::from_parts("PROJ-123", "Add login page", "In Progress")?;
    let setup = setup(vec![ticket.clone()])?;

    let before = setup.engine.refresh().await?;
    let state = before
        .state_for(ticket.key())
        .ok_or_else(|| eyre!("ticket missing from first refresh"))?;
    ensure!(
        resolve_actions(state) == vec![Action::ViewInTracker, Action::CreateBranch],
        "unexpected actions before branch creation: {:?}",
        resolve_actions(state)
    );

    let created = setup
        .engine
        .create_branch(ticket.key())
        .await
        .wrap_err("create branch for PROJ-123")?;
    ensure!(created.branch().as_str() == "feature/PROJ-123");

    let after = setup.engine.reconcile(vec![ticket.clone()]).await;
    let state = after
        .state_for(ticket.key())
        .ok_or_else(|| eyre!("ticket missing from second refresh"))?;
    ensure!(state.branch().exists(), "branch should exist");
    ensure!(state.branch().is_current(), "branch should be current");
    ensure!(state.pull_request().is_none(), "no pull request yet");
    ensure!(
        resolve_actions(state) == vec![Action::ViewInTracker, Action::CreatePullRequest],
        "unexpected actions after branch creation: {:?}",
        resolve_actions(state)
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn full_cycle_links_pull_request_from_ticket() -> eyre::Result<()> {
    let ticket = Ticket::from_parts("PROJ-200", "Cache tokens", "In Progress")?;
    let setup = setup(vec![ticket.clone()])?;
    setup.vcs.set_diff(
        branch("main"),
        branch("feature/PROJ-200"),
        "+struct TokenCache;\n",
    )?;
    let engine = setup
        .engine
        .with_summarizer(Arc::new(ScriptedDiffSummarizer::answering(
            "Introduces a token cache.",
        )));

    engine.create_branch(ticket.key()).await?;
    let created = engine.create_pull_request(&ticket).await?;
    ensure!(created.warnings().is_empty(), "{:?}", created.warnings());

    let comments = setup.tracker.comments_for(ticket.key())?;
    ensure!(
        comments == vec![format!("Pull request created: {}", created.pull_request().url())],
        "unexpected comments: {comments:?}"
    );
    let requests = setup.review.created_requests()?;
    let request = requests
        .first()
        .ok_or_else(|| eyre!("no pull request was requested"))?;
    ensure!(request.description.contains("Introduces a token cache."));

    let report = engine.refresh().await?;
    let state = report
        .state_for(ticket.key())
        .ok_or_else(|| eyre!("ticket missing from refresh"))?;
    ensure!(state.pull_request() == Some(created.pull_request()));
    ensure!(resolve_actions(state) == vec![Action::ViewInTracker, Action::ViewPullRequest]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn switching_back_to_an_existing_branch() -> eyre::Result<()> {
    let first = Ticket::from_parts("PROJ-1", "First", "Open")?;
    let second = Ticket::from_parts("PROJ-2", "Second", "Open")?;
    let setup = setup(vec![first.clone(), second.clone()])?;

    setup.engine.create_branch(first.key()).await?;
    setup.engine.create_branch(second.key()).await?;

    let report = setup.engine.refresh().await?;
    let state = report
        .state_for(first.key())
        .ok_or_else(|| eyre!("first ticket missing"))?;
    ensure!(
        resolve_actions(state)
            == vec![
                Action::ViewInTracker,
                Action::SwitchToBranch,
                Action::CreatePullRequest
            ]
    );

    let switched = setup.engine.switch_to_branch(first.key()).await?;
    ensure!(setup.vcs.current()? == Some(switched));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn degraded_review_service_keeps_refresh_usable() -> eyre::Result<()> {
    let ticket = Ticket::from_parts("PROJ-7", "Degraded", "Open")?;
    let setup = setup(vec![ticket.clone()])?;
    setup.engine.create_branch(ticket.key()).await?;
    setup.review.fail_listing(Some("503 service unavailable"))?;

    let report = setup.engine.refresh().await?;

    let state = report
        .state_for(ticket.key())
        .ok_or_else(|| eyre!("ticket missing"))?;
    ensure!(state.pull_request_lookup_failed());
    ensure!(report.warnings().len() == 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn stale_target_still_produces_branch() {
    let ticket = Ticket::from_parts("PROJ-8", "Offline", "Open").expect("valid ticket");
    let setup = setup(vec![ticket.clone()]).expect("setup");
    setup
        .vcs
        .fail(VersionControlOperation::Pull)
        .expect("inject failure");

    let created = setup
        .engine
        .create_branch(ticket.key())
        .await
        .expect("branch created from stale target");

    assert!(matches!(created.warnings(), [WorkflowWarning::PullFailed { .. }]));
}
