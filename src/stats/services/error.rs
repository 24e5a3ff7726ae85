//! Service-level errors for statistics.

use crate::{access::domain::AccessError, error::ErrorKind, task::ports::TaskRepositoryError};
use std::time::Duration;
use thiserror::Error;

/// Errors returned by [`super::StatsAggregator`].
#[derive(Debug, Clone, Error)]
pub enum StatsError {
    /// No actor accompanied the request.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Loading tasks failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// Loading tasks did not finish in time.
    #[error("task listing timed out after {limit:?}")]
    Timeout {
        /// Configured time budget.
        limit: Duration,
    },
}

/// Result type for statistics operations.
pub type StatsResult<T> = Result<T, StatsError>;

impl StatsError {
    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Access(_) => ErrorKind::Unauthenticated,
            Self::Repository(_) => ErrorKind::StorageFailure,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    /// Returns the HTTP status expected by transport collaborators.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.kind().http_status()
    }
}
