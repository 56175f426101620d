//! Workbridge: ticket, branch and pull request workflow engine.
//!
//! This crate reconciles work-tracking tickets with the state of a local
//! working copy and a code-review service, derives the actions available
//! for each ticket, and orchestrates branch and pull request creation.
//!
//! # Architecture
//!
//! Workbridge follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (git, in-memory)
//!
//! # Modules
//!
//! - [`config`]: Workflow settings and their validation
//! - [`workflow`]: Reconciliation, action resolution and orchestration

pub mod config;
pub mod workflow;
