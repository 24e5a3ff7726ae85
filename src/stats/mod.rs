//! Per-category task statistics.
//!
//! Statistics are recomputed from the tasks an actor can see on every call;
//! nothing is cached or written back.
//!
//! - Domain types and the pure grouping in [`domain`]
//! - The actor-scoped aggregator in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
