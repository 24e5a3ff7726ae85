//! Service-level errors for task operations.

use crate::{
    access::{
        domain::{AccessError, ParseUserIdError, UserId},
        policy::{DenyReason, TaskAction},
        ports::UserDirectoryError,
    },
    attachment::{domain::AttachmentId, services::AttachmentStoreError},
    error::ErrorKind,
    task::{
        domain::{ParseTaskStatusError, TaskDomainError, TaskId},
        ports::TaskRepositoryError,
    },
};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while parsing task request fields.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskValidationError {
    /// A required field is missing or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Title or category failed domain validation.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The status is not a known value.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),

    /// The due date could not be parsed.
    #[error("invalid due date '{0}', expected YYYY-MM-DD")]
    InvalidDueDate(String),

    /// The due time could not be parsed.
    #[error("invalid due time '{0}', expected HH:MM")]
    InvalidDueTime(String),

    /// The assignee is not a valid user identifier.
    #[error(transparent)]
    InvalidAssignee(#[from] ParseUserIdError),

    /// The assignee does not exist.
    #[error("assigned user does not exist: {0}")]
    UnknownAssignee(UserId),
}

/// Errors returned by [`super::TaskService`].
#[derive(Debug, Clone, Error)]
pub enum TaskServiceError {
    /// No actor accompanied the request.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// The access policy denied the action.
    #[error("cannot {action} task {task_id}: {reason}")]
    Forbidden {
        /// Task the action targeted.
        task_id: TaskId,
        /// Denied action.
        action: TaskAction,
        /// Denial reason.
        reason: DenyReason,
    },

    /// No task has the given identifier.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The attachment does not exist or is not referenced by the task.
    #[error("attachment not found: {0}")]
    AttachmentNotFound(AttachmentId),

    /// Request fields were rejected.
    #[error(transparent)]
    Validation(#[from] TaskValidationError),

    /// Attachment store operation failed.
    #[error(transparent)]
    Attachment(#[from] AttachmentStoreError),

    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// User directory lookup failed.
    #[error(transparent)]
    Directory(#[from] UserDirectoryError),

    /// A port did not answer in time.
    #[error("task {operation} timed out after {limit:?}")]
    Timeout {
        /// Port operation that timed out.
        operation: &'static str,
        /// Configured time budget.
        limit: Duration,
    },

    /// A task write did not answer in time, so it may still commit.
    ///
    /// Attachments stored for the write are kept, since the task may end up
    /// referencing them.
    #[error("{operation} of task {task_id} timed out after {limit:?}; outcome unknown")]
    WriteOutcomeUnknown {
        /// Write that timed out.
        operation: &'static str,
        /// Task being written.
        task_id: TaskId,
        /// Attachments stored for the write and left in place.
        pending: Vec<AttachmentId>,
        /// Configured time budget.
        limit: Duration,
    },

    /// A write failed after attachments were stored, and removing them
    /// failed too.
    #[error(
        "{operation} of task {task_id} failed and left {orphan_count} orphaned attachment(s): {source}",
        orphan_count = .orphaned.len()
    )]
    PartialWrite {
        /// Write that failed.
        operation: &'static str,
        /// Task being written.
        task_id: TaskId,
        /// Attachments still stored without a task reference.
        orphaned: Vec<AttachmentId>,
        /// Failure that interrupted the write.
        source: Box<TaskServiceError>,
    },
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

impl TaskServiceError {
    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Access(_) => ErrorKind::Unauthenticated,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::TaskNotFound(_)
            | Self::AttachmentNotFound(_)
            | Self::Repository(TaskRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Attachment(err) => err.kind(),
            Self::Repository(
                TaskRepositoryError::VersionConflict { .. } | TaskRepositoryError::DuplicateTask(_),
            ) => ErrorKind::Conflict,
            Self::Repository(TaskRepositoryError::Persistence(_)) | Self::Directory(_) => {
                ErrorKind::StorageFailure
            }
            Self::Timeout { .. } | Self::WriteOutcomeUnknown { .. } => ErrorKind::Timeout,
            Self::PartialWrite { .. } => ErrorKind::PartialWrite,
        }
    }

    /// Returns the HTTP status expected by transport collaborators.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Attachment(err) => err.http_status(),
            _ => self.kind().http_status(),
        }
    }

    /// Returns whether retrying the same request may succeed.
    ///
    /// A write with an unknown outcome is not retryable: the first attempt
    /// may already have landed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::WriteOutcomeUnknown { .. } => false,
            _ => self.kind().is_retryable(),
        }
    }
}
