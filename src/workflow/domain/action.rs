//! Action resolution for ticket workflow states.

use super::TicketWorkflowState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation a caller may offer for a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Open the ticket in the issue tracker.
    ViewInTracker,
    /// Create the ticket's branch from the target branch.
    CreateBranch,
    /// Check out the ticket's existing branch.
    SwitchToBranch,
    /// Open a pull request from the ticket's branch.
    CreatePullRequest,
    /// Open the ticket's existing pull request.
    ViewPullRequest,
}

impl Action {
    /// Returns the canonical action name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ViewInTracker => "view_in_tracker",
            Self::CreateBranch => "create_branch",
            Self::SwitchToBranch => "switch_to_branch",
            Self::CreatePullRequest => "create_pull_request",
            Self::ViewPullRequest => "view_pull_request",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Workflow phase classified from a [`TicketWorkflowState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    /// The ticket's branch does not exist.
    NoBranch,
    /// The branch exists but another branch is checked out.
    BranchExistsElsewhere,
    /// The branch exists and is checked out.
    BranchExistsCurrent,
}

impl WorkflowPhase {
    /// Classifies a ticket state.
    #[must_use]
    pub const fn of(state: &TicketWorkflowState) -> Self {
        let branch = state.branch();
        match (branch.exists(), branch.is_current()) {
            (false, _) => Self::NoBranch,
            (true, false) => Self::BranchExistsElsewhere,
            (true, true) => Self::BranchExistsCurrent,
        }
    }
}

/// Returns the ordered set of legal actions for a ticket state.
///
/// `ViewInTracker` is always first. Whenever the branch exists exactly one of
/// `CreatePullRequest` and `ViewPullRequest` is present, chosen by whether a
/// pull request was found.
#[must_use]
pub fn resolve_actions(state: &TicketWorkflowState) -> Vec<Action> {
    let pull_request_action = if state.pull_request().is_some() {
        Action::ViewPullRequest
    } else {
        Action::CreatePullRequest
    };

    match WorkflowPhase::of(state) {
        WorkflowPhase::NoBranch => vec![Action::ViewInTracker, Action::CreateBranch],
        WorkflowPhase::BranchExistsElsewhere => vec![
            Action::ViewInTracker,
            Action::SwitchToBranch,
            pull_request_action,
        ],
        WorkflowPhase::BranchExistsCurrent => vec![Action::ViewInTracker, pull_request_action],
    }
}
