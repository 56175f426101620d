//! Branch creation and switching for tickets.

use crate::config::target_branch_setting;
use crate::workflow::{
    domain::{BranchName, TicketKey, branch_name},
    ports::VersionControl,
    services::error::{WorkflowError, WorkflowResult, WorkflowWarning},
};
use std::sync::Arc;

/// Successful branch creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchCreated {
    branch: BranchName,
    warnings: Vec<WorkflowWarning>,
}

impl BranchCreated {
    /// Returns the created and checked-out branch.
    #[must_use]
    pub const fn branch(&self) -> &BranchName {
        &self.branch
    }

    /// Returns best-effort step failures.
    #[must_use]
    pub fn warnings(&self) -> &[WorkflowWarning] {
        &self.warnings
    }
}

/// Branch workflow orchestration service.
#[derive(Clone)]
pub struct BranchWorkflowService<V>
where
    V: VersionControl,
{
    version_control: Arc<V>,
}

impl<V> BranchWorkflowService<V>
where
    V: VersionControl,
{
    /// Creates a new branch workflow service.
    #[must_use]
    pub const fn new(version_control: Arc<V>) -> Self {
        Self { version_control }
    }

    /// Creates and checks out the ticket's branch from `target_branch`.
    ///
    /// Steps run strictly in order: existence check, checkout of the target
    /// when another branch is current, pull of the target, then creation.
    /// Only the pull is best-effort; its failure becomes a
    /// [`WorkflowWarning::PullFailed`]. A failed creation leaves the working
    /// copy on the target branch.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Configuration`] for an unusable target
    /// branch before touching the working copy,
    /// [`WorkflowError::BranchAlreadyExists`] when the branch exists locally
    /// or remotely (without checking out or pulling), and
    /// [`WorkflowError::VersionControl`] when inspection, checkout or
    /// creation fails.
    pub async fn create_branch(
        &self,
        ticket_key: &TicketKey,
        prefix: &str,
        target_branch: &str,
    ) -> WorkflowResult<BranchCreated> {
        let target = target_branch_setting(target_branch)?;
        let name = branch_name(prefix, ticket_key);

        let exists = self
            .version_control
            .branch_exists(&name)
            .await
            .map_err(|err| WorkflowError::version_control("check branch existence", err))?;
        if exists {
            return Err(WorkflowError::BranchAlreadyExists(name));
        }

        let current = self
            .version_control
            .current_branch_name()
            .await
            .map_err(|err| WorkflowError::version_control("read current branch", err))?;
        if current.as_ref() != Some(&target) {
            tracing::debug!(ticket = %ticket_key, target = %target, "checking out target branch");
            self.version_control
                .checkout(&target)
                .await
                .map_err(|err| WorkflowError::version_control("checkout target branch", err))?;
        }

        let mut warnings = Vec::new();
        if let Err(err) = self.version_control.pull().await {
            tracing::warn!(
                ticket = %ticket_key,
                target = %target,
                error = %err,
                "pull failed; creating branch from local target"
            );
            warnings.push(WorkflowWarning::PullFailed {
                branch: target.clone(),
                reason: err.to_string(),
            });
        }

        self.version_control
            .create_and_checkout(&name)
            .await
            .map_err(|err| WorkflowError::version_control("create branch", err))?;

        tracing::info!(ticket = %ticket_key, branch = %name, "branch created");
        Ok(BranchCreated {
            branch: name,
            warnings,
        })
    }

    /// Checks out the ticket's existing branch.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::BranchNotFound`] when the branch exists
    /// neither locally nor remotely, and [`WorkflowError::VersionControl`]
    /// when inspection or checkout fails.
    pub async fn switch_to_branch(
        &self,
        ticket_key: &TicketKey,
        prefix: &str,
    ) -> WorkflowResult<BranchName> {
        let name = branch_name(prefix, ticket_key);

        let exists = self
            .version_control
            .branch_exists(&name)
            .await
            .map_err(|err| WorkflowError::version_control("check branch existence", err))?;
        if !exists {
            return Err(WorkflowError::BranchNotFound(name));
        }

        self.version_control
            .checkout(&name)
            .await
            .map_err(|err| WorkflowError::version_control("checkout branch", err))?;

        tracing::info!(ticket = %ticket_key, branch = %name, "switched branch");
        Ok(name)
    }
}
