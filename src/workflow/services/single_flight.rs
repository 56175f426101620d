//! In-process single-flight guard keyed by ticket.

use crate::workflow::{
    domain::TicketKey,
    services::error::{WorkflowError, WorkflowResult},
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Tracks tickets with a workflow operation in flight.
///
/// Only guards callers sharing this registry inside one process.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    keys: Arc<Mutex<HashSet<TicketKey>>>,
}

impl InFlightRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `ticket_key` as busy until the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::OperationInFlight`] when an operation for the
    /// ticket is already running.
    pub fn try_acquire(&self, ticket_key: &TicketKey) -> WorkflowResult<InFlightGuard> {
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        if !keys.insert(ticket_key.clone()) {
            return Err(WorkflowError::OperationInFlight(ticket_key.clone()));
        }
        Ok(InFlightGuard {
            keys: Arc::clone(&self.keys),
            ticket_key: ticket_key.clone(),
        })
    }

    /// Returns whether an operation for `ticket_key` is running.
    #[must_use]
    pub fn is_in_flight(&self, ticket_key: &TicketKey) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(ticket_key)
    }
}

/// Releases a ticket's in-flight mark when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    keys: Arc<Mutex<HashSet<TicketKey>>>,
    ticket_key: TicketKey,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.ticket_key);
    }
}
