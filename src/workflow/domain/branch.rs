//! Branch naming and branch-state value objects.

use super::{TicketKey, WorkflowDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix Git uses for local branch references.
pub const HEADS_REF_PREFIX: &str = "refs/heads/";

/// Git branch name.
///
/// Names derived for tickets come from [`branch_name`] and are never
/// normalised. Names supplied from configuration go through
/// [`BranchName::new`], which rejects values Git would not accept as a
/// branch.
///
/// # Examples
///
///     use workbridge::workflow::domain::BranchName;
///
///     let name = BranchName::new("main").expect("valid");
///     assert_eq!(name.head_ref(), "refs/heads/main");
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Creates a validated branch name.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvalidBranchName`] when the value is
    /// empty or contains whitespace or a colon.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkflowDomainError> {
        let raw = value.into();
        let is_invalid =
            raw.is_empty() || raw.contains(':') || raw.chars().any(char::is_whitespace);
        if is_invalid {
            return Err(WorkflowDomainError::InvalidBranchName(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the branch name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the fully-qualified local reference, `refs/heads/<name>`.
    #[must_use]
    pub fn head_ref(&self) -> String {
        format!("{HEADS_REF_PREFIX}{}", self.0)
    }

    /// Returns the remote-tracking short name, `<remote>/<name>`.
    #[must_use]
    pub fn remote_tracking(&self, remote: &str) -> String {
        format!("{remote}/{}", self.0)
    }
}

impl TryFrom<String> for BranchName {
    type Error = WorkflowDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BranchName> for String {
    fn from(value: BranchName) -> Self {
        value.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derives the branch name for a ticket: `prefix + ticket_key`, verbatim.
///
/// Every component that needs a ticket's branch name goes through this
/// function so independently computed names are byte-equal.
///
/// # Examples
///
///     use workbridge::workflow::domain::{TicketKey, branch_name};
///
///     let key = TicketKey::new("PROJ-123").expect("valid");
///     assert_eq!(branch_name("feature/", &key).as_str(), "feature/PROJ-123");
#[must_use]
pub fn branch_name(prefix: &str, ticket_key: &TicketKey) -> BranchName {
    BranchName(format!("{prefix}{ticket_key}"))
}

/// Observed state of a ticket's branch in the working copy.
///
/// A branch can only be current when it exists. The constructors never build
/// the opposite combination and deserialisation rejects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BranchStateDocument")]
pub struct BranchState {
    name: BranchName,
    exists: bool,
    is_current: bool,
}

#[derive(Deserialize)]
struct BranchStateDocument {
    name: BranchName,
    exists: bool,
    is_current: bool,
}

impl TryFrom<BranchStateDocument> for BranchState {
    type Error = WorkflowDomainError;

    fn try_from(document: BranchStateDocument) -> Result<Self, Self::Error> {
        match (document.exists, document.is_current) {
            (true, is_current) => Ok(Self::present(document.name, is_current)),
            (false, false) => Ok(Self::absent(document.name)),
            (false, true) => Err(WorkflowDomainError::InconsistentState(
                "a branch that does not exist cannot be current",
            )),
        }
    }
}

impl BranchState {
    /// State of a branch that exists neither locally nor remotely.
    #[must_use]
    pub const fn absent(name: BranchName) -> Self {
        Self {
            name,
            exists: false,
            is_current: false,
        }
    }

    /// State of an existing branch.
    #[must_use]
    pub const fn present(name: BranchName, is_current: bool) -> Self {
        Self {
            name,
            exists: true,
            is_current,
        }
    }

    /// Returns the branch name.
    #[must_use]
    pub const fn name(&self) -> &BranchName {
        &self.name
    }

    /// Returns whether the branch exists locally or as a remote-tracking ref.
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.exists
    }

    /// Returns whether the branch is checked out in the working copy.
    #[must_use]
    pub const fn is_current(&self) -> bool {
        self.is_current
    }
}
