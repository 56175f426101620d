//! Pull-request reference value objects.

use super::{BranchName, WorkflowDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Positive pull request identifier issued by the code-review service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct PullRequestId(u64);

impl PullRequestId {
    /// Creates a validated pull request identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvalidPullRequestId`] when the value
    /// is zero.
    pub const fn new(value: u64) -> Result<Self, WorkflowDomainError> {
        if value == 0 {
            return Err(WorkflowDomainError::InvalidPullRequestId(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for PullRequestId {
    type Error = WorkflowDomainError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PullRequestId> for u64 {
    fn from(value: PullRequestId) -> Self {
        value.0
    }
}

impl fmt::Display for PullRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Open pull request as reported by the code-review service.
///
/// # Examples
///
///     use workbridge::workflow::domain::{BranchName, PullRequestRef};
///
///     let pr = PullRequestRef::from_parts(
///         7,
///         "refs/heads/feature/ABC-2",
///         "https://review.example.test/pr/7",
///     )
///     .expect("valid");
///     let branch = BranchName::new("feature/ABC-2").expect("valid");
///     assert!(pr.belongs_to(&branch));
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PullRequestRef {
    id: PullRequestId,
    source_ref_name: String,
    url: String,
}

impl PullRequestRef {
    /// Creates a pull request reference from validated components.
    #[must_use]
    pub fn new(
        id: PullRequestId,
        source_ref_name: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            source_ref_name: source_ref_name.into(),
            url: url.into(),
        }
    }

    /// Creates a pull request reference from raw service values.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvalidPullRequestId`] when the
    /// identifier is zero.
    pub fn from_parts(
        id: u64,
        source_ref_name: &str,
        url: &str,
    ) -> Result<Self, WorkflowDomainError> {
        Ok(Self::new(PullRequestId::new(id)?, source_ref_name, url))
    }

    /// Returns the pull request identifier.
    #[must_use]
    pub const fn id(&self) -> PullRequestId {
        self.id
    }

    /// Returns the fully-qualified source reference, e.g. `refs/heads/x`.
    #[must_use]
    pub fn source_ref_name(&self) -> &str {
        &self.source_ref_name
    }

    /// Returns the browsable pull request URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns whether this pull request was opened from `branch`.
    ///
    /// Matching is exact byte equality against `refs/heads/<branch>`, with no
    /// case folding or separator normalisation.
    #[must_use]
    pub fn belongs_to(&self, branch: &BranchName) -> bool {
        self.source_ref_name == branch.head_ref()
    }
}

/// Finds the pull request opened from `branch`, if any.
#[must_use]
pub fn find_for_branch<'a>(
    pull_requests: &'a [PullRequestRef],
    branch: &BranchName,
) -> Option<&'a PullRequestRef> {
    pull_requests.iter().find(|pr| pr.belongs_to(branch))
}
