//! Shared world state for ticket workflow BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use workbridge::config::WorkflowSettings;
use workbridge::workflow::{
    WorkflowEngine,
    adapters::memory::{InMemoryCodeReview, InMemoryIssueTracker, InMemoryVersionControl},
    domain::{Ticket, TicketKey},
    services::{BranchCreated, PullRequestCreated, ReconciliationReport, WorkflowError},
};

/// Engine type used by the BDD world.
pub type TestEngine = WorkflowEngine<
    InMemoryIssueTracker,
    InMemoryVersionControl,
    InMemoryCodeReview,
    DefaultClock,
>;

/// Scenario world for ticket workflow behaviour tests.
pub struct TicketWorkflowWorld {
    pub tracker: Arc<InMemoryIssueTracker>,
    pub vcs: Arc<InMemoryVersionControl>,
    pub review: Arc<InMemoryCodeReview>,
    pub settings: WorkflowSettings,
    pub tickets: Vec<Ticket>,
    pub engine: Option<TestEngine>,
    pub last_report: Option<ReconciliationReport>,
    pub last_branch_result: Option<Result<BranchCreated, WorkflowError>>,
    pub last_pull_request_result: Option<Result<PullRequestCreated, WorkflowError>>,
}

impl TicketWorkflowWorld {
    /// Creates a world with empty collaborators and default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tracker: Arc::new(InMemoryIssueTracker::new("https://tracker.example")),
            vcs: Arc::new(InMemoryVersionControl::default()),
            review: Arc::new(InMemoryCodeReview::new("https://review.example")),
            settings: WorkflowSettings::default(),
            tickets: Vec::new(),
            engine: None,
            last_report: None,
            last_branch_result: None,
            last_pull_request_result: None,
        }
    }

    /// Returns the engine, building it from the current settings on first
    /// use.
    pub fn engine(&mut self) -> Result<&TestEngine, eyre::Report> {
        if self.engine.is_none() {
            let engine = WorkflowEngine::new(
                self.settings.clone(),
                Arc::clone(&self.tracker),
                Arc::clone(&self.vcs),
                Arc::clone(&self.review),
                Arc::new(DefaultClock),
            )
            .map_err(|err| eyre::eyre!("invalid scenario settings: {err}"))?;
            self.engine = Some(engine);
        }
        self.engine
            .as_ref()
            .ok_or_else(|| eyre::eyre!("engine was not built"))
    }

    /// Returns the scenario ticket with the given key.
    pub fn ticket(&self, key: &str) -> Result<Ticket, eyre::Report> {
        let ticket_key =
            TicketKey::new(key).map_err(|err| eyre::eyre!("invalid ticket key: {err}"))?;
        self.tickets
            .iter()
            .find(|ticket| ticket.key() == &ticket_key)
            .cloned()
            .ok_or_else(|| eyre::eyre!("unknown ticket {key} in scenario world"))
    }
}

impl Default for TicketWorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TicketWorkflowWorld {
    TicketWorkflowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
