//! `PostgreSQL` adapters for attachment persistence.

mod models;
mod repository;
mod schema;

pub use repository::{AttachmentPgPool, PostgresAttachmentRepository};
