//! Code-review service port.

use super::RemoteServiceResult;
use crate::workflow::domain::{BranchName, PullRequestRef};
use async_trait::async_trait;

/// Payload for opening a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    /// Branch the changes come from.
    pub source_branch: BranchName,
    /// Branch the changes merge into.
    pub target_branch: BranchName,
    /// Pull request title.
    pub title: String,
    /// Pull request description (Markdown).
    pub description: String,
}

/// Code-review service contract.
#[async_trait]
pub trait CodeReview: Send + Sync {
    /// Lists active pull requests in the repository.
    async fn list_open_pull_requests(&self) -> RemoteServiceResult<Vec<PullRequestRef>>;

    /// Opens a pull request.
    async fn create(&self, request: &NewPullRequest) -> RemoteServiceResult<PullRequestRef>;
}
