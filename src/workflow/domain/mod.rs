//! Domain model for ticket workflow reconciliation.
//!
//! The domain holds the merged ticket, branch and pull request view and the
//! pure rules derived from it: branch naming, pull request matching and
//! action resolution. Nothing here performs I/O.

mod action;
mod branch;
mod error;
mod pull_request;
mod state;
mod ticket;

pub use action::{Action, WorkflowPhase, resolve_actions};
pub use branch::{BranchName, BranchState, HEADS_REF_PREFIX, branch_name};
pub use error::WorkflowDomainError;
pub use pull_request::{PullRequestId, PullRequestRef, find_for_branch};
pub use state::{PullRequestLookup, TicketWorkflowState};
pub use ticket::{Ticket, TicketKey};
