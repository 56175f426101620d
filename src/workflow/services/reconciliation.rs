//! Ticket state reconciliation across tracker, working copy and review
//! service.

use crate::workflow::{
    domain::{
        BranchName, BranchState, PullRequestLookup, Ticket, TicketKey, TicketWorkflowState,
        branch_name, find_for_branch,
    },
    ports::{CodeReview, IssueTracker, VersionControl, VersionControlError},
    services::error::{WorkflowError, WorkflowResult},
};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Number of tickets reconciled concurrently unless configured otherwise.
pub const DEFAULT_RECONCILE_CONCURRENCY: usize = 4;

/// Identifier of one refresh cycle.
///
/// Callers that start a new refresh before the previous one resolves use it
/// to discard the stale report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshId(Uuid);

impl RefreshId {
    /// Creates a new random refresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for RefreshId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RefreshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lookup failure that degraded one ticket's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationWarning {
    /// The branch could not be inspected and is reported as absent.
    BranchLookupFailed {
        /// Affected ticket.
        ticket_key: TicketKey,
        /// Branch that was being inspected.
        branch: BranchName,
        /// Failure description.
        reason: String,
    },

    /// Open pull requests could not be listed for an existing branch.
    PullRequestLookupFailed {
        /// Affected ticket.
        ticket_key: TicketKey,
        /// Failure description.
        reason: String,
    },
}

impl ReconciliationWarning {
    /// Returns the affected ticket.
    #[must_use]
    pub const fn ticket_key(&self) -> &TicketKey {
        match self {
            Self::BranchLookupFailed { ticket_key, .. }
            | Self::PullRequestLookupFailed { ticket_key, .. } => ticket_key,
        }
    }
}

impl fmt::Display for ReconciliationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BranchLookupFailed {
                ticket_key,
                branch,
                reason,
            } => write!(f, "{ticket_key}: could not inspect branch {branch}: {reason}"),
            Self::PullRequestLookupFailed { ticket_key, reason } => {
                write!(f, "{ticket_key}: could not list pull requests: {reason}")
            }
        }
    }
}

/// Result of one refresh: a state per input ticket, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationReport {
    refresh_id: RefreshId,
    refreshed_at: DateTime<Utc>,
    states: Vec<TicketWorkflowState>,
    warnings: Vec<ReconciliationWarning>,
}

impl ReconciliationReport {
    /// Returns the refresh identifier.
    #[must_use]
    pub const fn refresh_id(&self) -> RefreshId {
        self.refresh_id
    }

    /// Returns when the refresh completed.
    #[must_use]
    pub const fn refreshed_at(&self) -> DateTime<Utc> {
        self.refreshed_at
    }

    /// Returns the ticket states in tracker order.
    #[must_use]
    pub fn states(&self) -> &[TicketWorkflowState] {
        &self.states
    }

    /// Returns the lookup failures that degraded individual tickets.
    #[must_use]
    pub fn warnings(&self) -> &[ReconciliationWarning] {
        &self.warnings
    }

    /// Returns the state of the given ticket, if it was reconciled.
    #[must_use]
    pub fn state_for(&self, ticket_key: &TicketKey) -> Option<&TicketWorkflowState> {
        self.states
            .iter()
            .find(|state| state.ticket().key() == ticket_key)
    }

    /// Consumes the report, returning the ticket states.
    #[must_use]
    pub fn into_states(self) -> Vec<TicketWorkflowState> {
        self.states
    }
}

struct TicketOutcome {
    state: TicketWorkflowState,
    warnings: Vec<ReconciliationWarning>,
}

/// Computes [`TicketWorkflowState`] for batches of tickets.
#[derive(Clone)]
pub struct TicketStateAggregator<T, V, R, C>
where
    T: IssueTracker,
    V: VersionControl,
    R: CodeReview,
    C: Clock + Send + Sync,
{
    tracker: Arc<T>,
    version_control: Arc<V>,
    code_review: Arc<R>,
    clock: Arc<C>,
    concurrency: usize,
}

impl<T, V, R, C> TicketStateAggregator<T, V, R, C>
where
    T: IssueTracker,
    V: VersionControl,
    R: CodeReview,
    C: Clock + Send + Sync,
{
    /// Creates an aggregator with the default concurrency.
    #[must_use]
    pub const fn new(
        tracker: Arc<T>,
        version_control: Arc<V>,
        code_review: Arc<R>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tracker,
            version_control,
            code_review,
            clock,
            concurrency: DEFAULT_RECONCILE_CONCURRENCY,
        }
    }

    /// Sets how many tickets are reconciled concurrently. Zero is treated as
    /// one.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = if concurrency == 0 { 1 } else { concurrency };
        self
    }

    /// Queries the tracker and reconciles the returned tickets.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::RemoteService`] when the ticket list cannot
    /// be fetched. Per-ticket lookup failures never fail the refresh.
    pub async fn refresh(
        &self,
        filter: &str,
        prefix: &str,
    ) -> WorkflowResult<ReconciliationReport> {
        let tickets = self
            .tracker
            .query_assigned(filter)
            .await
            .map_err(|err| WorkflowError::remote("query assigned tickets", err))?;
        tracing::debug!(count = tickets.len(), "fetched tickets for reconciliation");
        Ok(self.reconcile(tickets, prefix).await)
    }

    /// Computes the workflow state of every ticket.
    ///
    /// The output has one state per input ticket, in input order, no matter
    /// how many lookups fail.
    pub async fn reconcile(&self, tickets: Vec<Ticket>, prefix: &str) -> ReconciliationReport {
        let refresh_id = RefreshId::new();
        let outcomes: Vec<TicketOutcome> = stream::iter(tickets)
            .map(|ticket| self.reconcile_ticket(ticket, prefix))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut states = Vec::with_capacity(outcomes.len());
        let mut warnings = Vec::new();
        for outcome in outcomes {
            states.push(outcome.state);
            warnings.extend(outcome.warnings);
        }

        tracing::debug!(
            %refresh_id,
            tickets = states.len(),
            warnings = warnings.len(),
            "reconciliation finished"
        );
        ReconciliationReport {
            refresh_id,
            refreshed_at: self.clock.utc(),
            states,
            warnings,
        }
    }

    async fn reconcile_ticket(&self, ticket: Ticket, prefix: &str) -> TicketOutcome {
        let name = branch_name(prefix, ticket.key());
        let mut warnings = Vec::new();

        let branch = match self.inspect_branch(&name).await {
            Ok(branch) => branch,
            Err(err) => {
                tracing::warn!(
                    ticket = %ticket.key(),
                    branch = %name,
                    error = %err,
                    "branch lookup failed; reporting branch as absent"
                );
                warnings.push(ReconciliationWarning::BranchLookupFailed {
                    ticket_key: ticket.key().clone(),
                    branch: name.clone(),
                    reason: err.to_string(),
                });
                BranchState::absent(name)
            }
        };

        if !branch.exists() {
            return TicketOutcome {
                state: TicketWorkflowState::without_branch(ticket, branch),
                warnings,
            };
        }

        let lookup = match self.code_review.list_open_pull_requests().await {
            Ok(pull_requests) => find_for_branch(&pull_requests, branch.name())
                .cloned()
                .map_or(PullRequestLookup::Absent, PullRequestLookup::Found),
            Err(err) => {
                tracing::warn!(
                    ticket = %ticket.key(),
                    error = %err,
                    "pull request lookup failed"
                );
                warnings.push(ReconciliationWarning::PullRequestLookupFailed {
                    ticket_key: ticket.key().clone(),
                    reason: err.to_string(),
                });
                PullRequestLookup::Failed
            }
        };

        TicketOutcome {
            state: TicketWorkflowState::with_branch(ticket, branch, lookup),
            warnings,
        }
    }

    async fn inspect_branch(
        &self,
        name: &BranchName,
    ) -> Result<BranchState, VersionControlError> {
        if !self.version_control.branch_exists(name).await? {
            return Ok(BranchState::absent(name.clone()));
        }
        let current = self.version_control.current_branch_name().await?;
        let is_current = current.as_ref() == Some(name);
        Ok(BranchState::present(name.clone(), is_current))
    }
}
