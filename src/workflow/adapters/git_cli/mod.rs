//! `VersionControl` adapter driving the `git` command-line client.

mod runner;


pub use runner::{CommandOutput, CommandRunner, ProcessCommandRunner};

use crate::config::WorkflowSettings;
use crate::workflow::{
    domain::BranchName,
    ports::{VersionControl, VersionControlError, VersionControlResult},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Environment variable overriding the git binary.
pub const ENV_GIT_BIN: &str = "WORKBRIDGE_GIT_BIN";

const DEFAULT_GIT_BIN: &str = "git";

/// Git working copy driven through the CLI.
#[derive(Debug, Clone)]
pub struct GitCliVersionControl<R: CommandRunner> {
    runner: R,
    binary: PathBuf,
    worktree: PathBuf,
    remote: String,
}

impl GitCliVersionControl<ProcessCommandRunner> {
    /// Creates an adapter for the working copy at `worktree`, using the
    /// binary named by `WORKBRIDGE_GIT_BIN` or `git` from `PATH`.
    #[must_use]
    pub fn open(worktree: impl Into<PathBuf>, remote: impl Into<String>) -> Self {
        let binary = std::env::var_os(ENV_GIT_BIN)
            .filter(|value| !value.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_GIT_BIN), PathBuf::from);
        Self::with_runner(ProcessCommandRunner, binary, worktree, remote)
    }

    /// Creates an adapter for `worktree` tracking the configured remote.
    #[must_use]
    pub fn for_settings(worktree: impl Into<PathBuf>, settings: &WorkflowSettings) -> Self {
        Self::open(worktree, settings.remote_name.clone())
    }
}

impl<R: CommandRunner> GitCliVersionControl<R> {
    /// Creates an adapter with an explicit runner and binary.
    #[must_use]
    pub fn with_runner(
        runner: R,
        binary: impl Into<PathBuf>,
        worktree: impl Into<PathBuf>,
        remote: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            binary: binary.into(),
            worktree: worktree.into(),
            remote: remote.into(),
        }
    }

    /// Returns the working copy path.
    #[must_use]
    pub fn worktree(&self) -> &Path {
        &self.worktree
    }

    async fn run_git_raw(&self, args: &[String]) -> VersionControlResult<CommandOutput> {
        self.runner
            .run(&self.binary, args, &self.worktree)
            .await
            .map_err(VersionControlError::unavailable)
    }

    async fn run_git(&self, args: &[String]) -> VersionControlResult<CommandOutput> {
        let output = self.run_git_raw(args).await?;
        if output.success() {
            return Ok(output);
        }
        Err(self.command_failed(args, &output))
    }

    fn command_failed(&self, args: &[String], output: &CommandOutput) -> VersionControlError {
        let stderr = output.stderr.trim();
        let diagnostic = if stderr.is_empty() {
            output.stdout.trim()
        } else {
            stderr
        };
        VersionControlError::CommandFailed {
            command: format!("{} {}", self.binary.display(), args.join(" ")),
            stderr: diagnostic.to_owned(),
        }
    }

    /// `git show-ref --verify --quiet <ref>` exits 1 when the ref is absent.
    async fn ref_exists(&self, reference: String) -> VersionControlResult<bool> {
        let args = git_args(&["show-ref", "--verify", "--quiet"], [reference]);
        let output = self.run_git_raw(&args).await?;
        match output.exit_code {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(self.command_failed(&args, &output)),
        }
    }
}

fn git_args<const N: usize>(fixed: &[&str], dynamic: [String; N]) -> Vec<String> {
    fixed
        .iter()
        .map(|arg| (*arg).to_owned())
        .chain(dynamic)
        .collect()
}

#[async_trait]
impl<R: CommandRunner> VersionControl for GitCliVersionControl<R> {
    async fn branch_exists(&self, name: &BranchName) -> VersionControlResult<bool> {
        if self.ref_exists(name.head_ref()).await? {
            return Ok(true);
        }
        let remote_ref = format!("refs/remotes/{}", name.remote_tracking(&self.remote));
        self.ref_exists(remote_ref).await
    }

    async fn current_branch_name(&self) -> VersionControlResult<Option<BranchName>> {
        let args = git_args(&["symbolic-ref", "--quiet", "--short", "HEAD"], []);
        let output = self.run_git_raw(&args).await?;
        match output.exit_code {
            Some(0) => Ok(BranchName::new(output.stdout.trim()).ok()),
            // Detached HEAD.
            Some(1) => Ok(None),
            _ => Err(self.command_failed(&args, &output)),
        }
    }

    async fn checkout(&self, name: &BranchName) -> VersionControlResult<()> {
        self.run_git(&git_args(&["checkout"], [name.to_string()]))
            .await
            .map(|_| ())
    }

    async fn pull(&self) -> VersionControlResult<()> {
        self.run_git(&git_args(&["pull", "--ff-only"], []))
            .await
            .map(|_| ())
    }

    async fn create_and_checkout(&self, name: &BranchName) -> VersionControlResult<()> {
        self.run_git(&git_args(&["checkout", "-b"], [name.to_string()]))
            .await
            .map(|_| ())
    }

    async fn diff(&self, from: &BranchName, to: &BranchName) -> VersionControlResult<String> {
        let range = format!("{from}...{to}");
        let output = self.run_git(&git_args(&["diff"], [range])).await?;
        Ok(output.stdout)
    }
}
