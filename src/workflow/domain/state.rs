//! Merged per-ticket workflow state.

use super::{BranchState, PullRequestRef, Ticket, WorkflowDomainError};
use serde::{Deserialize, Serialize};

/// Outcome of looking up a branch's open pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestLookup {
    /// An open pull request was opened from the branch.
    Found(PullRequestRef),
    /// No open pull request matches the branch.
    Absent,
    /// The code-review service could not be queried.
    Failed,
}

/// Merged tracker, branch and pull request view of one ticket.
///
/// Built wholesale on every refresh and never patched afterwards. When the
/// branch does not exist the pull request is always `None` and the lookup is
/// never marked failed, because no lookup is attempted. A found pull request
/// and a failed lookup are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TicketWorkflowStateDocument")]
pub struct TicketWorkflowState {
    ticket: Ticket,
    branch: BranchState,
    pull_request: Option<PullRequestRef>,
    pull_request_lookup_failed: bool,
}

#[derive(Deserialize)]
struct TicketWorkflowStateDocument {
    ticket: Ticket,
    branch: BranchState,
    pull_request: Option<PullRequestRef>,
    pull_request_lookup_failed: bool,
}

impl TryFrom<TicketWorkflowStateDocument> for TicketWorkflowState {
    type Error = WorkflowDomainError;

    fn try_from(document: TicketWorkflowStateDocument) -> Result<Self, Self::Error> {
        let TicketWorkflowStateDocument {
            ticket,
            branch,
            pull_request,
            pull_request_lookup_failed,
        } = document;
        if !branch.exists() && (pull_request.is_some() || pull_request_lookup_failed) {
            return Err(WorkflowDomainError::InconsistentState(
                "pull request data requires an existing branch",
            ));
        }
        let lookup = match (pull_request, pull_request_lookup_failed) {
            (Some(_), true) => {
                return Err(WorkflowDomainError::InconsistentState(
                    "a found pull request cannot have a failed lookup",
                ));
            }
            (Some(pr), false) => PullRequestLookup::Found(pr),
            (None, true) => PullRequestLookup::Failed,
            (None, false) => PullRequestLookup::Absent,
        };
        Ok(Self::with_branch(ticket, branch, lookup))
    }
}

impl TicketWorkflowState {
    /// State of a ticket whose branch does not exist.
    #[must_use]
    pub fn without_branch(ticket: Ticket, branch: BranchState) -> Self {
        let absent = if branch.exists() {
            BranchState::absent(branch.name().clone())
        } else {
            branch
        };
        Self {
            ticket,
            branch: absent,
            pull_request: None,
            pull_request_lookup_failed: false,
        }
    }

    /// State of a ticket whose branch exists, with the pull request lookup
    /// outcome.
    ///
    /// Falls back to [`Self::without_branch`] when `branch` does not exist,
    /// discarding `lookup`.
    #[must_use]
    pub fn with_branch(ticket: Ticket, branch: BranchState, lookup: PullRequestLookup) -> Self {
        if !branch.exists() {
            return Self::without_branch(ticket, branch);
        }
        let (pull_request, pull_request_lookup_failed) = match lookup {
            PullRequestLookup::Found(pr) => (Some(pr), false),
            PullRequestLookup::Absent => (None, false),
            PullRequestLookup::Failed => (None, true),
        };
        Self {
            ticket,
            branch,
            pull_request,
            pull_request_lookup_failed,
        }
    }

    /// Returns the ticket.
    #[must_use]
    pub const fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    /// Returns the branch state.
    #[must_use]
    pub const fn branch(&self) -> &BranchState {
        &self.branch
    }

    /// Returns the open pull request for the branch, if one was found.
    #[must_use]
    pub const fn pull_request(&self) -> Option<&PullRequestRef> {
        self.pull_request.as_ref()
    }

    /// Returns whether the pull request lookup failed for this ticket.
    #[must_use]
    pub const fn pull_request_lookup_failed(&self) -> bool {
        self.pull_request_lookup_failed
    }
}
