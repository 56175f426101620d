//! Ticket workflow reconciliation and orchestration.
//!
//! This module merges tickets from an issue tracker with local branches and
//! open pull requests into one [`domain::TicketWorkflowState`] per ticket,
//! resolves which actions are available for each, and runs the two
//! mutating workflows: creating a ticket branch and opening a pull request
//! for it. The module follows hexagonal architecture:
//!
//! - Domain types and pure rules in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - A settings-bound facade in [`engine`]

pub mod adapters;
pub mod domain;
pub mod engine;
pub mod ports;
pub mod services;

pub use engine::WorkflowEngine;

#[cfg(test)]
mod tests;
