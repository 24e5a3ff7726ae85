//! Repository port for task persistence and scoped listing.

use crate::{
    access::policy::VisibilityScope,
    task::domain::{Task, TaskId, TaskVersion},
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Writes to existing tasks are conditional on the version the caller
/// loaded, so two concurrent writers cannot silently overwrite each other.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Replaces a stored task if its stored version still equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::VersionConflict`] when another writer got
    /// there first.
    async fn update(&self, task: &Task, expected: TaskVersion) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Deletes a task if its stored version still equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::VersionConflict`] when it changed since it
    /// was loaded.
    async fn delete(&self, id: TaskId, expected: TaskVersion) -> TaskRepositoryResult<()>;

    /// Returns every task within `scope`, newest first.
    async fn list(&self, scope: VisibilityScope) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored version no longer matches the one the writer loaded.
    #[error("task {task_id} was modified concurrently (expected {expected}, found {actual})")]
    VersionConflict {
        /// Task being written.
        task_id: TaskId,
        /// Version the writer loaded.
        expected: TaskVersion,
        /// Version currently stored.
        actual: TaskVersion,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
