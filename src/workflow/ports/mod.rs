//! Port contracts for the external systems the workflow engine reconciles.
//!
//! Ports define infrastructure-agnostic interfaces used by workflow
//! services. Every call returns an explicit `Result`.

pub mod code_review;
pub mod diff_summarizer;
pub mod issue_tracker;
pub mod remote;
pub mod version_control;

pub use code_review::{CodeReview, NewPullRequest};
pub use diff_summarizer::{DiffSummarizer, SummarizerError, SummarizerResult};
pub use issue_tracker::IssueTracker;
pub use remote::{RemoteServiceError, RemoteServiceResult};
pub use version_control::{VersionControl, VersionControlError, VersionControlResult};
