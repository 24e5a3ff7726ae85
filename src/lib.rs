//! Taskdeck: shared task tracking with attachments and access control.
//!
//! Users create tasks, delegate them to one assignee, attach files, and
//! track progress. Owners, assignees, and administrators are the only
//! parties who can see or change a task, and per-category statistics are
//! computed over exactly the tasks an actor can see.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and lookups
//! - **Adapters**: In-memory and `PostgreSQL` implementations of ports
//! - **Services**: Orchestration that authorizes and sequences port calls
//!
//! # Modules
//!
//! - [`access`]: Actors, roles, and the task access policy
//! - [`attachment`]: Upload validation, blob storage, and downloads
//! - [`task`]: Task creation, change, removal, and listing
//! - [`stats`]: Per-category status counts
//! - [`config`]: Service limits and timeouts
//! - [`error`]: Crate-wide failure categories
//! - [`telemetry`]: Tracing subscriber setup

pub mod access;
pub mod attachment;
pub mod config;
pub mod error;
pub mod stats;
pub mod task;
pub mod telemetry;
