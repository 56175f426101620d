//! Error types for workflow domain validation.

use thiserror::Error;

/// Errors returned while constructing workflow domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowDomainError {
    /// The ticket key is empty or whitespace only.
    #[error("ticket key must not be empty")]
    EmptyTicketKey,

    /// The branch name is empty, contains whitespace, or contains a colon.
    #[error("invalid branch name '{0}'")]
    InvalidBranchName(String),

    /// The pull request identifier is not a positive integer.
    #[error("invalid pull request id {0}, expected a positive integer")]
    InvalidPullRequestId(u64),

    /// A deserialised value combines fields the constructors never produce.
    #[error("inconsistent workflow state: {0}")]
    InconsistentState(&'static str),
}
