//! Optional diff summarizer port.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for summarizer operations.
pub type SummarizerResult<T> = Result<T, SummarizerError>;

/// Produces a prose summary of a diff.
#[async_trait]
pub trait DiffSummarizer: Send + Sync {
    /// Summarizes `diff`. `Ok(None)` means the summarizer had nothing to say.
    async fn summarize(&self, diff: &str) -> SummarizerResult<Option<String>>;
}

/// Errors returned by summarizer adapters.
#[derive(Debug, Clone, Error)]
pub enum SummarizerError {
    /// The summarizer has no usable configuration.
    #[error("diff summarizer is not configured")]
    NotConfigured,

    /// The summarizer call failed.
    #[error("diff summarizer failed: {0}")]
    Failed(Arc<dyn std::error::Error + Send + Sync>),
}

impl SummarizerError {
    /// Wraps a summarizer failure.
    #[must_use]
    pub fn failed(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Failed(Arc::new(err))
    }
}
