//! Issue-tracker ticket value objects.

use super::WorkflowDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique, stable ticket identifier issued by the issue tracker.
///
/// The key is kept verbatim: it feeds branch naming, which must never
/// normalise separators or case.
///
/// # Examples
///
///     use workbridge::workflow::domain::TicketKey;
///
///     let key = TicketKey::new("PROJ-123").expect("valid");
///     assert_eq!(key.as_str(), "PROJ-123");
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TicketKey(String);

impl TicketKey {
    /// Creates a ticket key.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyTicketKey`] when the value is empty
    /// or whitespace only.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkflowDomainError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(WorkflowDomainError::EmptyTicketKey);
        }
        Ok(Self(raw))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TicketKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TicketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for TicketKey {
    type Error = WorkflowDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for TicketKey {
    type Error = WorkflowDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TicketKey> for String {
    fn from(value: TicketKey) -> Self {
        value.0
    }
}

/// Ticket as fetched from the issue tracker.
///
/// Tickets are immutable once fetched. A refresh supersedes them with new
/// values instead of mutating the old ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    key: TicketKey,
    summary: String,
    status_name: String,
}

impl Ticket {
    /// Creates a ticket from tracker values.
    #[must_use]
    pub fn new(key: TicketKey, summary: impl Into<String>, status_name: impl Into<String>) -> Self {
        Self {
            key,
            summary: summary.into(),
            status_name: status_name.into(),
        }
    }

    /// Creates a ticket from raw tracker values.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyTicketKey`] when the key is empty.
    pub fn from_parts(
        key: &str,
        summary: &str,
        status_name: &str,
    ) -> Result<Self, WorkflowDomainError> {
        Ok(Self::new(TicketKey::new(key)?, summary, status_name))
    }

    /// Returns the ticket key.
    #[must_use]
    pub const fn key(&self) -> &TicketKey {
        &self.key
    }

    /// Returns the ticket summary line.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Returns the tracker's name for the ticket's current status.
    #[must_use]
    pub fn status_name(&self) -> &str {
        &self.status_name
    }

    /// Builds the pull request title, `"[KEY]: summary"`.
    #[must_use]
    pub fn pull_request_title(&self) -> String {
        format!("[{}]: {}", self.key, self.summary)
    }
}
