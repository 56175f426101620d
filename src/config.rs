//! Process-wide workflow settings.
//!
//! Settings are read once, validated before any collaborator is called, and
//! treated as read-only for the lifetime of every operation.

use crate::workflow::{domain::BranchName, services::DEFAULT_RECONCILE_CONCURRENCY};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding [`WorkflowSettings::branch_prefix`].
pub const ENV_BRANCH_PREFIX: &str = "WORKBRIDGE_BRANCH_PREFIX";
/// Environment variable overriding [`WorkflowSettings::target_branch`].
pub const ENV_TARGET_BRANCH: &str = "WORKBRIDGE_TARGET_BRANCH";
/// Environment variable overriding [`WorkflowSettings::remote_name`].
pub const ENV_REMOTE: &str = "WORKBRIDGE_REMOTE";
/// Environment variable overriding [`WorkflowSettings::ticket_filter`].
pub const ENV_TICKET_FILTER: &str = "WORKBRIDGE_TICKET_FILTER";
/// Environment variable overriding [`WorkflowSettings::reconcile_concurrency`].
pub const ENV_RECONCILE_CONCURRENCY: &str = "WORKBRIDGE_RECONCILE_CONCURRENCY";

const DEFAULT_BRANCH_PREFIX: &str = "feature/";
const DEFAULT_TARGET_BRANCH: &str = "main";
const DEFAULT_REMOTE: &str = "origin";
const DEFAULT_TICKET_FILTER: &str = "assignee = currentUser() ORDER BY updated DESC";

/// Errors raised when required settings are missing or unusable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A required setting is empty.
    #[error("required setting `{0}` is missing")]
    MissingSetting(&'static str),

    /// A setting holds a value that cannot be used.
    #[error("setting `{name}` is invalid: {reason}")]
    InvalidSetting {
        /// Setting name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The settings document could not be parsed.
    #[error("malformed settings document: {0}")]
    Malformed(String),
}

/// Workflow settings shared by reconciliation and both workflows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowSettings {
    /// Prefix prepended verbatim to ticket keys to name branches.
    pub branch_prefix: String,
    /// Branch new ticket branches start from and pull requests merge into.
    pub target_branch: String,
    /// Remote whose tracking branches count as existing branches.
    pub remote_name: String,
    /// Tracker query selecting the tickets to reconcile.
    pub ticket_filter: String,
    /// Maximum number of tickets reconciled concurrently.
    pub reconcile_concurrency: usize,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            branch_prefix: DEFAULT_BRANCH_PREFIX.to_owned(),
            target_branch: DEFAULT_TARGET_BRANCH.to_owned(),
            remote_name: DEFAULT_REMOTE.to_owned(),
            ticket_filter: DEFAULT_TICKET_FILTER.to_owned(),
            reconcile_concurrency: DEFAULT_RECONCILE_CONCURRENCY,
        }
    }
}

impl WorkflowSettings {
    /// Parses and validates settings from a JSON document.
    ///
    /// Absent fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Malformed`] when the document does not
    /// parse, or a validation error from [`Self::validate`].
    pub fn from_json_str(document: &str) -> Result<Self, ConfigurationError> {
        let settings: Self = serde_json::from_str(document)
            .map_err(|err| ConfigurationError::Malformed(err.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Builds settings from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Self::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from a key lookup, falling back to defaults for
    /// unset keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidSetting`] when the concurrency
    /// value is not a number, or a validation error from [`Self::validate`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let reconcile_concurrency = match lookup(ENV_RECONCILE_CONCURRENCY) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|err| {
                ConfigurationError::InvalidSetting {
                    name: "reconcile_concurrency",
                    reason: format!("'{raw}' is not a non-negative integer: {err}"),
                }
            })?,
            None => defaults.reconcile_concurrency,
        };

        let settings = Self {
            branch_prefix: lookup(ENV_BRANCH_PREFIX).unwrap_or(defaults.branch_prefix),
            target_branch: lookup(ENV_TARGET_BRANCH).unwrap_or(defaults.target_branch),
            remote_name: lookup(ENV_REMOTE).unwrap_or(defaults.remote_name),
            ticket_filter: lookup(ENV_TICKET_FILTER).unwrap_or(defaults.ticket_filter),
            reconcile_concurrency,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingSetting`] for an empty target
    /// branch, remote or ticket filter, and
    /// [`ConfigurationError::InvalidSetting`] for an unusable prefix, target
    /// branch or concurrency.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        require("target_branch", &self.target_branch)?;
        require("remote_name", &self.remote_name)?;
        require("ticket_filter", &self.ticket_filter)?;

        let prefix_is_invalid = self
            .branch_prefix
            .chars()
            .any(|ch| ch == ':' || ch.is_whitespace());
        if prefix_is_invalid {
            return Err(ConfigurationError::InvalidSetting {
                name: "branch_prefix",
                reason: format!(
                    "'{}' must not contain whitespace or ':'",
                    self.branch_prefix
                ),
            });
        }

        if self.reconcile_concurrency == 0 {
            return Err(ConfigurationError::InvalidSetting {
                name: "reconcile_concurrency",
                reason: "must be at least 1".to_owned(),
            });
        }

        self.target_branch_name().map(|_| ())
    }

    /// Returns the target branch as a validated branch name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingSetting`] when the target branch
    /// is empty and [`ConfigurationError::InvalidSetting`] when Git would not
    /// accept it.
    pub fn target_branch_name(&self) -> Result<BranchName, ConfigurationError> {
        target_branch_setting(&self.target_branch)
    }
}

/// Validates a caller-supplied target branch the same way settings are.
///
/// # Errors
///
/// Returns [`ConfigurationError::MissingSetting`] for an empty value and
/// [`ConfigurationError::InvalidSetting`] for a name Git would not accept.
pub fn target_branch_setting(value: &str) -> Result<BranchName, ConfigurationError> {
    require("target_branch", value)?;
    BranchName::new(value).map_err(|err| ConfigurationError::InvalidSetting {
        name: "target_branch",
        reason: err.to_string(),
    })
}

fn require(name: &'static str, value: &str) -> Result<(), ConfigurationError> {
    if value.trim().is_empty() {
        return Err(ConfigurationError::MissingSetting(name));
    }
    Ok(())
}
