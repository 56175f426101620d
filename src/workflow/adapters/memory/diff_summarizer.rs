//! Scripted diff summarizer for workflow tests.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::workflow::ports::{DiffSummarizer, SummarizerError, SummarizerResult};

/// Summarizer returning a fixed response and recording the diffs it saw.
#[derive(Debug, Clone)]
pub struct ScriptedDiffSummarizer {
    response: SummarizerResult<Option<String>>,
    received: Arc<RwLock<Vec<String>>>,
}

impl ScriptedDiffSummarizer {
    /// Summarizer that always answers with `summary`.
    #[must_use]
    pub fn answering(summary: impl Into<String>) -> Self {
        Self::with_response(Ok(Some(summary.into())))
    }

    /// Summarizer that always fails with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_response(Err(SummarizerError::failed(std::io::Error::other(
            message.into(),
        ))))
    }

    /// Summarizer that reports it is not configured.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self::with_response(Err(SummarizerError::NotConfigured))
    }

    /// Summarizer returning `response` verbatim.
    #[must_use]
    pub fn with_response(response: SummarizerResult<Option<String>>) -> Self {
        Self {
            response,
            received: Arc::default(),
        }
    }

    /// Returns the diffs received so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`SummarizerError::Failed`] when lock acquisition fails.
    pub fn received_diffs(&self) -> SummarizerResult<Vec<String>> {
        let received = self
            .received
            .read()
            .map_err(|err| SummarizerError::failed(std::io::Error::other(err.to_string())))?;
        Ok(received.clone())
    }
}

#[async_trait]
impl DiffSummarizer for ScriptedDiffSummarizer {
    async fn summarize(&self, diff: &str) -> SummarizerResult<Option<String>> {
        self.received
            .write()
            .map_err(|err| SummarizerError::failed(std::io::Error::other(err.to_string())))?
            .push(diff.to_owned());
        self.response.clone()
    }
}
