//! Version-control port for branch inspection and mutation.

use crate::workflow::domain::BranchName;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for version-control operations.
pub type VersionControlResult<T> = Result<T, VersionControlError>;

/// Working-copy contract.
///
/// The working copy is a single shared mutable resource; callers must not
/// run two mutating operations against it concurrently.
///
/// Steps are not cancellable once issued. Dropping an operation's future
/// stops the caller from observing the outcome, but a checkout, pull or
/// branch creation already handed to the backend still runs to completion
/// and may change the working copy afterwards.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Returns whether `name` exists locally or as a remote-tracking branch.
    async fn branch_exists(&self, name: &BranchName) -> VersionControlResult<bool>;

    /// Returns the checked-out branch, or `None` on a detached head.
    async fn current_branch_name(&self) -> VersionControlResult<Option<BranchName>>;

    /// Checks out an existing branch.
    async fn checkout(&self, name: &BranchName) -> VersionControlResult<()>;

    /// Pulls upstream changes into the checked-out branch.
    async fn pull(&self) -> VersionControlResult<()>;

    /// Creates `name` from the checked-out branch and checks it out.
    async fn create_and_checkout(&self, name: &BranchName) -> VersionControlResult<()>;

    /// Returns the textual diff between two branches.
    async fn diff(&self, from: &BranchName, to: &BranchName) -> VersionControlResult<String>;
}

/// Errors returned by version-control adapters.
#[derive(Debug, Clone, Error)]
pub enum VersionControlError {
    /// A VCS command exited unsuccessfully.
    #[error("`{command}` failed: {stderr}")]
    CommandFailed {
        /// The command line that failed.
        command: String,
        /// Diagnostic output of the command.
        stderr: String,
    },

    /// The named branch does not exist.
    #[error("branch not found: {0}")]
    BranchNotFound(BranchName),

    /// The VCS backend could not be reached or executed.
    #[error("version control unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl VersionControlError {
    /// Wraps an execution failure.
    #[must_use]
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
