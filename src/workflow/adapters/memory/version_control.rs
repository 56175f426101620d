//! In-memory working copy for workflow tests.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::workflow::{
    domain::BranchName,
    ports::{VersionControl, VersionControlError, VersionControlResult},
};

/// Call received by [`InMemoryVersionControl`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionControlCall {
    /// `branch_exists` for the branch.
    BranchExists(BranchName),
    /// `current_branch_name`.
    CurrentBranch,
    /// `checkout` of the branch.
    Checkout(BranchName),
    /// `pull`.
    Pull,
    /// `create_and_checkout` of the branch.
    CreateAndCheckout(BranchName),
    /// `diff` between two branches.
    Diff {
        /// Base of the diff.
        from: BranchName,
        /// Tip of the diff.
        to: BranchName,
    },
}

/// Operation whose failure can be injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionControlOperation {
    /// Existence and current-branch inspection.
    Inspect,
    /// Checkout of an existing branch.
    Checkout,
    /// Pull of the checked-out branch.
    Pull,
    /// Branch creation.
    Create,
    /// Diff computation.
    Diff,
}

/// Thread-safe in-memory working copy with local and remote-tracking
/// branches.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVersionControl {
    state: Arc<RwLock<InMemoryVcsState>>,
}

#[derive(Debug, Default)]
struct InMemoryVcsState {
    local: BTreeSet<BranchName>,
    remote: BTreeSet<BranchName>,
    current: Option<BranchName>,
    diffs: HashMap<(BranchName, BranchName), String>,
    failing: HashSet<VersionControlOperation>,
    failing_lookups: HashSet<BranchName>,
    calls: Vec<VersionControlCall>,
}

fn lock_error(err: impl ToString) -> VersionControlError {
    VersionControlError::unavailable(std::io::Error::other(err.to_string()))
}

fn injected(command: &str) -> VersionControlError {
    VersionControlError::CommandFailed {
        command: command.to_owned(),
        stderr: "injected failure".to_owned(),
    }
}

impl InMemoryVersionControl {
    /// Creates a working copy with `current` as the only, checked-out,
    /// local branch.
    #[must_use]
    pub fn on_branch(current: BranchName) -> Self {
        let vcs = Self::default();
        if let Ok(mut state) = vcs.state.write() {
            state.local.insert(current.clone());
            state.current = Some(current);
        }
        vcs
    }

    /// Adds a local branch without checking it out.
    ///
    /// # Errors
    ///
    /// Returns an unavailable error when lock acquisition fails.
    pub fn add_local_branch(&self, name: BranchName) -> VersionControlResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.local.insert(name);
        Ok(())
    }

    /// Adds a remote-tracking branch.
    ///
    /// # Errors
    ///
    /// Returns an unavailable error when lock acquisition fails.
    pub fn add_remote_branch(&self, name: BranchName) -> VersionControlResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.remote.insert(name);
        Ok(())
    }

    /// Sets the diff text returned for `from..to`.
    ///
    /// # Errors
    ///
    /// Returns an unavailable error when lock acquisition fails.
    pub fn set_diff(
        &self,
        from: BranchName,
        to: BranchName,
        diff: impl Into<String>,
    ) -> VersionControlResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.diffs.insert((from, to), diff.into());
        Ok(())
    }

    /// Makes every call of `operation` fail.
    ///
    /// # Errors
    ///
    /// Returns an unavailable error when lock acquisition fails.
    pub fn fail(&self, operation: VersionControlOperation) -> VersionControlResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.failing.insert(operation);
        Ok(())
    }

    /// Makes inspection of one branch fail while others still succeed.
    ///
    /// # Errors
    ///
    /// Returns an unavailable error when lock acquisition fails.
    pub fn fail_lookup_of(&self, name: BranchName) -> VersionControlResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.failing_lookups.insert(name);
        Ok(())
    }

    /// Returns the checked-out branch.
    ///
    /// # Errors
    ///
    /// Returns an unavailable error when lock acquisition fails.
    pub fn current(&self) -> VersionControlResult<Option<BranchName>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.current.clone())
    }

    /// Returns whether a local branch exists.
    ///
    /// # Errors
    ///
    /// Returns an unavailable error when lock acquisition fails.
    pub fn has_local_branch(&self, name: &BranchName) -> VersionControlResult<bool> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.local.contains(name))
    }

    /// Returns the calls received so far.
    ///
    /// # Errors
    ///
    /// Returns an unavailable error when lock acquisition fails.
    pub fn calls(&self) -> VersionControlResult<Vec<VersionControlCall>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.calls.clone())
    }
}

#[async_trait]
impl VersionControl for InMemoryVersionControl {
    async fn branch_exists(&self, name: &BranchName) -> VersionControlResult<bool> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(VersionControlCall::BranchExists(name.clone()));
        if state.failing.contains(&VersionControlOperation::Inspect)
            || state.failing_lookups.contains(name)
        {
            return Err(injected("git show-ref"));
        }
        Ok(state.local.contains(name) || state.remote.contains(name))
    }

    async fn current_branch_name(&self) -> VersionControlResult<Option<BranchName>> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(VersionControlCall::CurrentBranch);
        if state.failing.contains(&VersionControlOperation::Inspect) {
            return Err(injected("git symbolic-ref"));
        }
        Ok(state.current.clone())
    }

    async fn checkout(&self, name: &BranchName) -> VersionControlResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(VersionControlCall::Checkout(name.clone()));
        if state.failing.contains(&VersionControlOperation::Checkout) {
            return Err(injected("git checkout"));
        }
        if !state.local.contains(name) {
            if !state.remote.contains(name) {
                return Err(VersionControlError::BranchNotFound(name.clone()));
            }
            state.local.insert(name.clone());
        }
        state.current = Some(name.clone());
        Ok(())
    }

    async fn pull(&self) -> VersionControlResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(VersionControlCall::Pull);
        if state.failing.contains(&VersionControlOperation::Pull) {
            return Err(injected("git pull"));
        }
        Ok(())
    }

    async fn create_and_checkout(&self, name: &BranchName) -> VersionControlResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .calls
            .push(VersionControlCall::CreateAndCheckout(name.clone()));
        if state.failing.contains(&VersionControlOperation::Create) {
            return Err(injected("git checkout -b"));
        }
        if state.local.contains(name) {
            return Err(VersionControlError::CommandFailed {
                command: format!("git checkout -b {name}"),
                stderr: format!("fatal: a branch named '{name}' already exists"),
            });
        }
        state.local.insert(name.clone());
        state.current = Some(name.clone());
        Ok(())
    }

    async fn diff(&self, from: &BranchName, to: &BranchName) -> VersionControlResult<String> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(VersionControlCall::Diff {
            from: from.clone(),
            to: to.clone(),
        });
        if state.failing.contains(&VersionControlOperation::Diff) {
            return Err(injected("git diff"));
        }
        Ok(state
            .diffs
            .get(&(from.clone(), to.clone()))
            .cloned()
            .unwrap_or_default())
    }
}
