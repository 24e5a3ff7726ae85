//! Attachment blob lifecycle.
//!
//! Attachments are binary files uploaded alongside a task. Each one belongs
//! to exactly one task and is stored together with its metadata; the owning
//! task keeps a lightweight [`domain::AttachmentRef`] per attachment for fast
//! listing.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Ingestion, retrieval and removal in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
