//! Repository port for attachment metadata and payloads.

use crate::{
    attachment::domain::{Attachment, AttachmentId},
    task::domain::TaskId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for attachment repository operations.
pub type AttachmentRepositoryResult<T> = Result<T, AttachmentRepositoryError>;

/// Attachment persistence contract.
///
/// Metadata and payload are always written and removed together.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    /// Stores a batch of attachments atomically: either every attachment is
    /// persisted or none is.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentRepositoryError::DuplicateAttachment`] when an
    /// identifier already exists.
    async fn store_batch(&self, attachments: &[Attachment]) -> AttachmentRepositoryResult<()>;

    /// Finds an attachment, payload included.
    ///
    /// Returns `None` when the attachment does not exist.
    async fn find_by_id(&self, id: AttachmentId) -> AttachmentRepositoryResult<Option<Attachment>>;

    /// Returns the identifiers of every attachment owned by a task.
    async fn list_ids_by_task(&self, task_id: TaskId)
    -> AttachmentRepositoryResult<Vec<AttachmentId>>;

    /// Removes one attachment, returning whether it existed.
    async fn delete(&self, id: AttachmentId) -> AttachmentRepositoryResult<bool>;

    /// Removes every attachment owned by a task, returning how many were
    /// removed.
    async fn delete_by_task(&self, task_id: TaskId) -> AttachmentRepositoryResult<u64>;
}

/// Errors returned by attachment repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AttachmentRepositoryError {
    /// An attachment with the same identifier already exists.
    #[error("duplicate attachment identifier: {0}")]
    DuplicateAttachment(AttachmentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AttachmentRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
