//! Adapter implementations for workflow ports.
//!
//! - [`memory`]: in-process tracker, working copy, review service and
//!   summarizer with failure injection
//! - [`git_cli`]: [`crate::workflow::ports::VersionControl`] backed by the
//!   `git` command-line client

pub mod git_cli;
pub mod memory;
