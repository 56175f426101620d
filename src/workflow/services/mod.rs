//! Application services for reconciliation and workflow orchestration.
//!
//! The aggregator and the two workflows never call each other; each talks
//! only to the ports it is constructed with.

mod branch_workflow;
mod error;
mod pull_request_workflow;
mod reconciliation;
mod single_flight;

pub use branch_workflow::{BranchCreated, BranchWorkflowService};
pub use error::{WorkflowError, WorkflowErrorKind, WorkflowResult, WorkflowWarning};
pub use pull_request_workflow::{
    MAX_SUMMARY_DIFF_BYTES, PullRequestCreated, PullRequestWorkflowService, render_description,
};
pub use reconciliation::{
    DEFAULT_RECONCILE_CONCURRENCY, ReconciliationReport, ReconciliationWarning, RefreshId,
    TicketStateAggregator,
};
pub use single_flight::{InFlightGuard, InFlightRegistry};
