//! In-memory code-review service for workflow tests.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::workflow::{
    domain::{PullRequestId, PullRequestRef},
    ports::{CodeReview, NewPullRequest, RemoteServiceError, RemoteServiceResult},
};

/// Thread-safe in-memory code-review service.
///
/// Created pull requests get sequential identifiers and are listed as open.
/// Creating a second open pull request from the same source is rejected.
#[derive(Debug, Clone)]
pub struct InMemoryCodeReview {
    base_url: String,
    state: Arc<RwLock<InMemoryReviewState>>,
}

#[derive(Debug, Default)]
struct InMemoryReviewState {
    open: Vec<PullRequestRef>,
    created: Vec<NewPullRequest>,
    last_id: u64,
    list_failure: Option<String>,
    create_failure: Option<String>,
}

fn lock_error(err: impl ToString) -> RemoteServiceError {
    RemoteServiceError::transport(std::io::Error::other(err.to_string()))
}

impl InMemoryCodeReview {
    /// Creates an empty service whose pull requests browse under `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            state: Arc::default(),
        }
    }

    /// Adds an already-open pull request.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn insert_open(&self, pull_request: PullRequestRef) -> RemoteServiceResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.last_id = state.last_id.max(pull_request.id().value());
        state.open.push(pull_request);
        Ok(())
    }

    /// Makes listing fail with a transport error, or succeed again when
    /// `message` is `None`.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn fail_listing(&self, message: Option<&str>) -> RemoteServiceResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.list_failure = message.map(str::to_owned);
        Ok(())
    }

    /// Makes creation fail with a transport error, or succeed again when
    /// `message` is `None`.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn fail_creation(&self, message: Option<&str>) -> RemoteServiceResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.create_failure = message.map(str::to_owned);
        Ok(())
    }

    /// Returns every creation request received, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn created_requests(&self) -> RemoteServiceResult<Vec<NewPullRequest>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.created.clone())
    }
}

#[async_trait]
impl CodeReview for InMemoryCodeReview {
    async fn list_open_pull_requests(&self) -> RemoteServiceResult<Vec<PullRequestRef>> {
        let state = self.state.read().map_err(lock_error)?;
        if let Some(message) = &state.list_failure {
            return Err(RemoteServiceError::transport(std::io::Error::other(
                message.clone(),
            )));
        }
        Ok(state.open.clone())
    }

    async fn create(&self, request: &NewPullRequest) -> RemoteServiceResult<PullRequestRef> {
        let mut state = self.state.write().map_err(lock_error)?;
        if let Some(message) = &state.create_failure {
            return Err(RemoteServiceError::transport(std::io::Error::other(
                message.clone(),
            )));
        }

        let source_ref_name = request.source_branch.head_ref();
        if state
            .open
            .iter()
            .any(|pr| pr.source_ref_name() == source_ref_name)
        {
            return Err(RemoteServiceError::Rejected(format!(
                "an active pull request already exists for {source_ref_name}"
            )));
        }

        let id = PullRequestId::new(state.last_id + 1)
            .map_err(|err| RemoteServiceError::Rejected(err.to_string()))?;
        let pull_request = PullRequestRef::new(
            id,
            source_ref_name,
            format!("{}/pullrequest/{id}", self.base_url),
        );
        state.last_id = id.value();
        state.created.push(request.clone());
        state.open.push(pull_request.clone());
        Ok(pull_request)
    }
}
