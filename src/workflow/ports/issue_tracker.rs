//! Issue tracker port.

use super::RemoteServiceResult;
use crate::workflow::domain::{Ticket, TicketKey};
use async_trait::async_trait;

/// Issue tracker contract.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Returns the tickets matching `filter`, in the tracker's order.
    ///
    /// The tracker is the ordering authority; callers never re-sort.
    async fn query_assigned(&self, filter: &str) -> RemoteServiceResult<Vec<Ticket>>;

    /// Posts a comment on a ticket.
    async fn add_comment(&self, ticket_key: &TicketKey, text: &str) -> RemoteServiceResult<()>;

    /// Returns the browsable URL of a ticket.
    fn ticket_url(&self, ticket_key: &TicketKey) -> String;
}
