//! In-memory issue tracker for workflow tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::workflow::{
    domain::{Ticket, TicketKey},
    ports::{IssueTracker, RemoteServiceError, RemoteServiceResult},
};

/// Thread-safe in-memory issue tracker.
///
/// Tickets are returned in insertion order for every filter. Query and
/// comment failures can be injected to exercise degraded paths.
#[derive(Debug, Clone)]
pub struct InMemoryIssueTracker {
    base_url: String,
    state: Arc<RwLock<InMemoryTrackerState>>,
}

#[derive(Debug, Default)]
struct InMemoryTrackerState {
    tickets: Vec<Ticket>,
    comments: HashMap<TicketKey, Vec<String>>,
    filters: Vec<String>,
    query_failure: Option<String>,
    comment_failure: Option<String>,
}

fn lock_error(err: impl ToString) -> RemoteServiceError {
    RemoteServiceError::transport(std::io::Error::other(err.to_string()))
}

impl InMemoryIssueTracker {
    /// Creates an empty tracker whose tickets browse under `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            state: Arc::default(),
        }
    }

    /// Replaces the tracker's tickets.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn set_tickets(&self, tickets: Vec<Ticket>) -> RemoteServiceResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.tickets = tickets;
        Ok(())
    }

    /// Makes ticket queries fail with an unauthorized error, or succeed
    /// again when `message` is `None`.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn fail_queries(&self, message: Option<&str>) -> RemoteServiceResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.query_failure = message.map(str::to_owned);
        Ok(())
    }

    /// Makes comments fail with a transport error, or succeed again when
    /// `message` is `None`.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn fail_comments(&self, message: Option<&str>) -> RemoteServiceResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.comment_failure = message.map(str::to_owned);
        Ok(())
    }

    /// Returns the comments posted on a ticket, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn comments_for(&self, ticket_key: &TicketKey) -> RemoteServiceResult<Vec<String>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.comments.get(ticket_key).cloned().unwrap_or_default())
    }

    /// Returns the filters received by ticket queries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn received_filters(&self) -> RemoteServiceResult<Vec<String>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.filters.clone())
    }
}

#[async_trait]
impl IssueTracker for InMemoryIssueTracker {
    async fn query_assigned(&self, filter: &str) -> RemoteServiceResult<Vec<Ticket>> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.filters.push(filter.to_owned());
        if let Some(message) = &state.query_failure {
            return Err(RemoteServiceError::Unauthorized(message.clone()));
        }
        Ok(state.tickets.clone())
    }

    async fn add_comment(&self, ticket_key: &TicketKey, text: &str) -> RemoteServiceResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if let Some(message) = &state.comment_failure {
            return Err(RemoteServiceError::transport(std::io::Error::other(
                message.clone(),
            )));
        }
        if !state.tickets.iter().any(|ticket| ticket.key() == ticket_key) {
            return Err(RemoteServiceError::NotFound(ticket_key.to_string()));
        }
        state
            .comments
            .entry(ticket_key.clone())
            .or_default()
            .push(text.to_owned());
        Ok(())
    }

    fn ticket_url(&self, ticket_key: &TicketKey) -> String {
        format!("{}/browse/{ticket_key}", self.base_url)
    }
}
