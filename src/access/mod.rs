//! Identity and authorization for task operations.
//!
//! The authenticated actor is produced by an external authentication
//! collaborator; this module only reads it. [`policy`] decides which task
//! actions an actor may perform and which tasks it may see, and the
//! [`ports::UserDirectory`] port resolves user references into display
//! summaries.
//!
//! - Domain types in [`domain`]
//! - Decision logic in [`policy`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod policy;
pub mod ports;

#[cfg(test)]
mod tests;
