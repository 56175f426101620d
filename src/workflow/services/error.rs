//! Service-level errors and best-effort warnings.

use crate::config::ConfigurationError;
use crate::workflow::{
    domain::{BranchName, TicketKey, WorkflowDomainError},
    ports::{RemoteServiceError, VersionControlError},
};
use std::fmt;
use thiserror::Error;

/// Coarse classification of a [`WorkflowError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowErrorKind {
    /// Required settings are missing or unusable.
    Configuration,
    /// The target resource already exists or is busy.
    Conflict,
    /// An expected resource is absent.
    NotFound,
    /// A collaborator could not be reached or refused authentication.
    Transport,
    /// Anything else.
    Unexpected,
}

/// Terminal error of a workflow operation.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Settings were rejected before any collaborator was called.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A caller-supplied value failed domain validation.
    #[error(transparent)]
    Domain(#[from] WorkflowDomainError),

    /// The ticket branch already exists locally or remotely.
    #[error("branch already exists: {0}")]
    BranchAlreadyExists(BranchName),

    /// The ticket branch does not exist.
    #[error("branch not found: {0}")]
    BranchNotFound(BranchName),

    /// Another workflow operation for the ticket has not finished yet.
    #[error("an operation is already in flight for ticket {0}")]
    OperationInFlight(TicketKey),

    /// A version-control step failed.
    #[error("{operation} failed: {source}")]
    VersionControl {
        /// Workflow step that failed.
        operation: &'static str,
        /// Underlying adapter error.
        source: VersionControlError,
    },

    /// An issue-tracker or code-review call failed.
    #[error("{operation} failed: {source}")]
    RemoteService {
        /// Workflow step that failed.
        operation: &'static str,
        /// Underlying adapter error.
        source: RemoteServiceError,
    },

    /// The pull request description template could not be rendered.
    #[error("failed to render pull request description: {0}")]
    DescriptionRender(String),
}

impl WorkflowError {
    /// Wraps a version-control failure for the named step.
    #[must_use]
    pub const fn version_control(operation: &'static str, source: VersionControlError) -> Self {
        Self::VersionControl { operation, source }
    }

    /// Wraps a remote-service failure for the named step.
    #[must_use]
    pub const fn remote(operation: &'static str, source: RemoteServiceError) -> Self {
        Self::RemoteService { operation, source }
    }

    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> WorkflowErrorKind {
        match self {
            Self::Configuration(_) => WorkflowErrorKind::Configuration,
            Self::BranchAlreadyExists(_) | Self::OperationInFlight(_) => {
                WorkflowErrorKind::Conflict
            }
            Self::BranchNotFound(_) => WorkflowErrorKind::NotFound,
            Self::VersionControl { source, .. } => match source {
                VersionControlError::BranchNotFound(_) => WorkflowErrorKind::NotFound,
                VersionControlError::Unavailable(_) => WorkflowErrorKind::Transport,
                VersionControlError::CommandFailed { .. } => WorkflowErrorKind::Unexpected,
            },
            Self::RemoteService { source, .. } => match source {
                RemoteServiceError::NotFound(_) => WorkflowErrorKind::NotFound,
                RemoteServiceError::Unauthorized(_) | RemoteServiceError::Transport(_) => {
                    WorkflowErrorKind::Transport
                }
                RemoteServiceError::Rejected(_) => WorkflowErrorKind::Conflict,
            },
            Self::Domain(_) | Self::DescriptionRender(_) => WorkflowErrorKind::Unexpected,
        }
    }
}

/// Result type for workflow service operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Best-effort step failure that accompanied a successful workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowWarning {
    /// Pulling the target branch failed; the new branch starts from the
    /// local, possibly stale, target.
    PullFailed {
        /// Branch that could not be synced.
        branch: BranchName,
        /// Failure description.
        reason: String,
    },

    /// The diff summary section was omitted.
    DiffSummaryUnavailable {
        /// Failure description.
        reason: String,
    },

    /// The ticket could not be commented with the pull request link.
    TicketCommentFailed {
        /// Ticket that was not commented.
        ticket_key: TicketKey,
        /// Failure description.
        reason: String,
    },
}

impl fmt::Display for WorkflowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PullFailed { branch, reason } => {
                write!(f, "could not pull latest changes on {branch}: {reason}")
            }
            Self::DiffSummaryUnavailable { reason } => {
                write!(f, "diff summary omitted: {reason}")
            }
            Self::TicketCommentFailed { ticket_key, reason } => {
                write!(f, "could not comment on {ticket_key}: {reason}")
            }
        }
    }
}
