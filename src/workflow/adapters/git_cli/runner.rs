//! Process execution seam for the git adapter.

use async_trait::async_trait;
use std::io;
use std::path::Path;
use tokio::process::Command;

/// Captured output of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
}

impl CommandOutput {
    /// Returns whether the process exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }
}

/// Runs an external program to completion.
///
/// Dropping the returned future detaches the child process. It is not killed.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` inside `working_dir`.
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        working_dir: &Path,
    ) -> io::Result<CommandOutput>;
}

/// [`CommandRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessCommandRunner;

#[async_trait]
impl CommandRunner for ProcessCommandRunner {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        working_dir: &Path,
    ) -> io::Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .output()
            .await?;
        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
