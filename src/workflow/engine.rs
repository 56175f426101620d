//! Caller-facing facade over reconciliation and both workflows.

use crate::config::{ConfigurationError, WorkflowSettings};
use crate::workflow::{
    domain::{BranchName, Ticket, TicketKey, branch_name},
    ports::{CodeReview, DiffSummarizer, IssueTracker, VersionControl},
    services::{
        BranchCreated, BranchWorkflowService, InFlightRegistry, PullRequestCreated,
        PullRequestWorkflowService, ReconciliationReport, TicketStateAggregator, WorkflowResult,
    },
};
use mockable::Clock;
use std::sync::Arc;

/// Workflow engine bound to validated settings and one set of
/// collaborators.
///
/// Mutating operations are single-flight per ticket key within the engine:
/// a second call for a ticket whose previous call has not resolved fails
/// immediately instead of touching the working copy.
pub struct WorkflowEngine<T, V, R, C>
where
    T: IssueTracker,
    V: VersionControl,
    R: CodeReview,
    C: Clock + Send + Sync,
{
    settings: WorkflowSettings,
    target_branch: BranchName,
    aggregator: TicketStateAggregator<T, V, R, C>,
    branches: BranchWorkflowService<V>,
    pull_requests: PullRequestWorkflowService<T, V, R>,
    in_flight: InFlightRegistry,
}

impl<T, V, R, C> WorkflowEngine<T, V, R, C>
where
    T: IssueTracker,
    V: VersionControl,
    R: CodeReview,
    C: Clock + Send + Sync,
{
    /// Validates `settings` and wires the services.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the settings are unusable. No
    /// collaborator is called.
    pub fn new(
        settings: WorkflowSettings,
        tracker: Arc<T>,
        version_control: Arc<V>,
        code_review: Arc<R>,
        clock: Arc<C>,
    ) -> Result<Self, ConfigurationError> {
        settings.validate()?;
        let target_branch = settings.target_branch_name()?;

        let aggregator = TicketStateAggregator::new(
            Arc::clone(&tracker),
            Arc::clone(&version_control),
            Arc::clone(&code_review),
            clock,
        )
        .with_concurrency(settings.reconcile_concurrency);
        let branches = BranchWorkflowService::new(Arc::clone(&version_control));
        let pull_requests = PullRequestWorkflowService::new(tracker, version_control, code_review);

        Ok(Self {
            settings,
            target_branch,
            aggregator,
            branches,
            pull_requests,
            in_flight: InFlightRegistry::new(),
        })
    }

    /// Enables diff-summary enrichment of pull request descriptions.
    #[must_use]
    pub fn with_summarizer(mut self, summarizer: Arc<dyn DiffSummarizer>) -> Self {
        self.pull_requests = self.pull_requests.with_summarizer(summarizer);
        self
    }

    /// Returns the validated settings.
    #[must_use]
    pub const fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// Returns the branch name derived for a ticket from the configured
    /// prefix.
    #[must_use]
    pub fn branch_name_for(&self, ticket_key: &TicketKey) -> BranchName {
        branch_name(&self.settings.branch_prefix, ticket_key)
    }

    /// Returns whether a mutating operation for the ticket is running.
    #[must_use]
    pub fn is_in_flight(&self, ticket_key: &TicketKey) -> bool {
        self.in_flight.is_in_flight(ticket_key)
    }

    /// Fetches the configured tickets and reconciles their state.
    ///
    /// # Errors
    ///
    /// Fails only when the ticket list cannot be fetched.
    pub async fn refresh(&self) -> WorkflowResult<ReconciliationReport> {
        self.aggregator
            .refresh(&self.settings.ticket_filter, &self.settings.branch_prefix)
            .await
    }

    /// Reconciles an already-fetched batch of tickets.
    pub async fn reconcile(&self, tickets: Vec<Ticket>) -> ReconciliationReport {
        self.aggregator
            .reconcile(tickets, &self.settings.branch_prefix)
            .await
    }

    /// Creates the ticket's branch from the configured target branch.
    ///
    /// # Errors
    ///
    /// Returns [`crate::workflow::services::WorkflowError::OperationInFlight`]
    /// while another operation for the ticket runs, otherwise see
    /// [`BranchWorkflowService::create_branch`].
    pub async fn create_branch(&self, ticket_key: &TicketKey) -> WorkflowResult<BranchCreated> {
        let _guard = self.in_flight.try_acquire(ticket_key)?;
        self.branches
            .create_branch(
                ticket_key,
                &self.settings.branch_prefix,
                self.target_branch.as_str(),
            )
            .await
    }

    /// Checks out the ticket's existing branch.
    ///
    /// # Errors
    ///
    /// Returns [`crate::workflow::services::WorkflowError::OperationInFlight`]
    /// while another operation for the ticket runs, otherwise see
    /// [`BranchWorkflowService::switch_to_branch`].
    pub async fn switch_to_branch(&self, ticket_key: &TicketKey) -> WorkflowResult<BranchName> {
        let _guard = self.in_flight.try_acquire(ticket_key)?;
        self.branches
            .switch_to_branch(ticket_key, &self.settings.branch_prefix)
            .await
    }

    /// Opens a pull request from the ticket's branch into the configured
    /// target branch.
    ///
    /// # Errors
    ///
    /// Returns [`crate::workflow::services::WorkflowError::OperationInFlight`]
    /// while another operation for the ticket runs, otherwise see
    /// [`PullRequestWorkflowService::create_pull_request`].
    pub async fn create_pull_request(&self, ticket: &Ticket) -> WorkflowResult<PullRequestCreated> {
        let _guard = self.in_flight.try_acquire(ticket.key())?;
        let source = self.branch_name_for(ticket.key());
        self.pull_requests
            .create_pull_request(ticket, source.as_str(), self.target_branch.as_str())
            .await
    }
}
