//! Stored attachments and the references tasks keep to them.

use super::{AttachmentId, FileType, StorageLocator};
use crate::{access::domain::UserId, task::domain::TaskId};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Attachment metadata without the binary payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentMetadata {
    /// Attachment identifier.
    pub id: AttachmentId,
    /// File name as uploaded.
    pub original_file_name: String,
    /// Normalized file type.
    pub file_type: FileType,
    /// Payload size in bytes.
    pub file_size: u64,
    /// Hex-encoded SHA-256 digest of the payload.
    pub content_digest: String,
    /// User who uploaded the file.
    pub uploader: UserId,
    /// Task that owns the attachment.
    pub task_id: TaskId,
    /// Stable retrieval key.
    pub storage_locator: StorageLocator,
    /// Upload timestamp.
    pub upload_date: DateTime<Utc>,
}

/// Lightweight copy of attachment metadata embedded in a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    /// Identifier of the referenced attachment.
    pub attachment_id: AttachmentId,
    /// File name as uploaded.
    pub original_file_name: String,
    /// Stable retrieval key.
    pub storage_locator: StorageLocator,
    /// Normalized file type.
    pub file_type: FileType,
    /// Payload size in bytes.
    pub file_size: u64,
    /// User who uploaded the file.
    pub uploader: UserId,
}

impl From<&AttachmentMetadata> for AttachmentRef {
    fn from(metadata: &AttachmentMetadata) -> Self {
        Self {
            attachment_id: metadata.id,
            original_file_name: metadata.original_file_name.clone(),
            storage_locator: metadata.storage_locator.clone(),
            file_type: metadata.file_type,
            file_size: metadata.file_size,
            uploader: metadata.uploader,
        }
    }
}

/// A stored attachment: metadata plus payload, persisted as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    metadata: AttachmentMetadata,
    content: Bytes,
}

/// Parameter object for reconstructing a persisted attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAttachmentData {
    /// Persisted metadata.
    pub metadata: AttachmentMetadata,
    /// Persisted payload.
    pub content: Bytes,
}

impl Attachment {
    /// Creates an attachment from validated metadata and its payload.
    #[must_use]
    pub const fn new(metadata: AttachmentMetadata, content: Bytes) -> Self {
        Self { metadata, content }
    }

    /// Reconstructs an attachment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAttachmentData) -> Self {
        Self::new(data.metadata, data.content)
    }

    /// Returns the attachment identifier.
    #[must_use]
    pub const fn id(&self) -> AttachmentId {
        self.metadata.id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.metadata.task_id
    }

    /// Returns the attachment metadata.
    #[must_use]
    pub const fn metadata(&self) -> &AttachmentMetadata {
        &self.metadata
    }

    /// Returns the payload.
    #[must_use]
    pub const fn content(&self) -> &Bytes {
        &self.content
    }

    /// Returns the reference embedded in the owning task.
    #[must_use]
    pub fn to_ref(&self) -> AttachmentRef {
        AttachmentRef::from(&self.metadata)
    }

    /// Splits the attachment into metadata and payload.
    #[must_use]
    pub fn into_parts(self) -> (AttachmentMetadata, Bytes) {
        (self.metadata, self.content)
    }
}
