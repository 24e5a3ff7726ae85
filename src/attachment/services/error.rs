//! Service-level errors for the attachment store.

use crate::{
    attachment::{
        domain::{AttachmentDomainError, AttachmentId},
        ports::AttachmentRepositoryError,
    },
    error::ErrorKind,
};
use std::time::Duration;
use thiserror::Error;

/// Errors returned by [`super::AttachmentStore`].
#[derive(Debug, Clone, Error)]
pub enum AttachmentStoreError {
    /// The upload was rejected.
    #[error(transparent)]
    Validation(#[from] AttachmentDomainError),

    /// No attachment has the given identifier.
    #[error("attachment not found: {0}")]
    NotFound(AttachmentId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] AttachmentRepositoryError),

    /// The repository did not answer in time.
    #[error("attachment {operation} timed out after {limit:?}")]
    Timeout {
        /// Repository operation that timed out.
        operation: &'static str,
        /// Configured time budget.
        limit: Duration,
    },
}

/// Result type for attachment store operations.
pub type AttachmentStoreResult<T> = Result<T, AttachmentStoreError>;

impl AttachmentStoreError {
    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Repository(_) => ErrorKind::StorageFailure,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    /// Returns the HTTP status expected by transport collaborators.
    ///
    /// Oversized uploads are reported as 413; everything else follows
    /// [`ErrorKind::http_status`].
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Validation(AttachmentDomainError::PayloadTooLarge { .. }) => 413,
            _ => self.kind().http_status(),
        }
    }
}
