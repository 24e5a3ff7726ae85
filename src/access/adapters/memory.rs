//! In-memory user directory for tests and embedded hosts.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::access::{
    domain::{UserId, UserSummary},
    ports::{UserDirectory, UserDirectoryError, UserDirectoryResult},
};

/// Thread-safe in-memory user directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<UserId, UserSummary>>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces a user summary.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Persistence`] if the lock is poisoned.
    pub fn insert(&self, user: UserSummary) -> UserDirectoryResult<()> {
        let mut users = self.users.write().map_err(|err| {
            UserDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        users.insert(user.id, user);
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_summary(&self, id: UserId) -> UserDirectoryResult<Option<UserSummary>> {
        let users = self.users.read().map_err(|err| {
            UserDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(users.get(&id).cloned())
    }

    async fn find_summaries(
        &self,
        ids: &[UserId],
    ) -> UserDirectoryResult<HashMap<UserId, UserSummary>> {
        let users = self.users.read().map_err(|err| {
            UserDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(ids
            .iter()
            .filter_map(|id| users.get(id).map(|user| (*id, user.clone())))
            .collect())
    }
}
