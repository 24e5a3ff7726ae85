//! Shared task management.
//!
//! Users create tasks, hand them to an assignee, attach files, and track
//! progress. Only the owner, the assignee, and administrators may see or
//! change a task. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
