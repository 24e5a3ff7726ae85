//! Diesel row models for attachment persistence.

use super::schema::attachments;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row shape shared by inserts and queries.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = attachments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AttachmentRow {
    /// Attachment identifier.
    pub id: uuid::Uuid,
    /// Owning task identifier.
    pub task_id: uuid::Uuid,
    /// Uploading user identifier.
    pub uploader_id: uuid::Uuid,
    /// File name as uploaded.
    pub original_file_name: String,
    /// Normalized file type token.
    pub file_type: String,
    /// Payload size in bytes.
    pub file_size: i64,
    /// Hex-encoded SHA-256 digest of the payload.
    pub content_digest: String,
    /// Stable retrieval key.
    pub storage_locator: String,
    /// Binary payload.
    pub content: Vec<u8>,
    /// Upload timestamp.
    pub upload_date: DateTime<Utc>,
}
