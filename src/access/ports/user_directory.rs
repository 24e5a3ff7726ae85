//! Read-only port onto the user records owned by the identity collaborator.

use crate::access::domain::{UserId, UserSummary};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user directory operations.
pub type UserDirectoryResult<T> = Result<T, UserDirectoryError>;

/// Lookup contract for user display data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns the summary for a user, or `None` if the user does not exist.
    async fn find_summary(&self, id: UserId) -> UserDirectoryResult<Option<UserSummary>>;

    /// Returns summaries for every known user among `ids`.
    ///
    /// Unknown identifiers are omitted from the map.
    async fn find_summaries(
        &self,
        ids: &[UserId],
    ) -> UserDirectoryResult<HashMap<UserId, UserSummary>>;

    /// Returns whether a user with the given identifier exists.
    async fn exists(&self, id: UserId) -> UserDirectoryResult<bool> {
        Ok(self.find_summary(id).await?.is_some())
    }
}

/// Errors returned by user directory implementations.
#[derive(Debug, Clone, Error)]
pub enum UserDirectoryError {
    /// Persistence-layer failure.
    #[error("user directory error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserDirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
