//! In-memory adapters for every workflow port.
//!
//! These adapters model collaborator behaviour without network or process
//! access, with failure injection for the degraded paths. They suit unit
//! and integration tests and deterministic local runs.

mod code_review;
mod diff_summarizer;
mod issue_tracker;
mod version_control;

pub use code_review::InMemoryCodeReview;
pub use diff_summarizer::ScriptedDiffSummarizer;
pub use issue_tracker::InMemoryIssueTracker;
pub use version_control::{InMemoryVersionControl, VersionControlCall, VersionControlOperation};
