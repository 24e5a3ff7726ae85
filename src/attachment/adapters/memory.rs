//! In-memory attachment repository for tests and embedded hosts.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{
    attachment::{
        domain::{Attachment, AttachmentId},
        ports::{AttachmentRepository, AttachmentRepositoryError, AttachmentRepositoryResult},
    },
    task::domain::TaskId,
};

/// Thread-safe in-memory attachment repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAttachmentRepository {
    attachments: Arc<RwLock<HashMap<AttachmentId, Attachment>>>,
}

impl InMemoryAttachmentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored attachments.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentRepositoryError::Persistence`] if the lock is
    /// poisoned.
    pub fn len(&self) -> AttachmentRepositoryResult<usize> {
        let attachments = self.attachments.read().map_err(|err| {
            AttachmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(attachments.len())
    }

    /// Returns whether the repository holds no attachments.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentRepositoryError::Persistence`] if the lock is
    /// poisoned.
    pub fn is_empty(&self) -> AttachmentRepositoryResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl AttachmentRepository for InMemoryAttachmentRepository {
    async fn store_batch(&self, batch: &[Attachment]) -> AttachmentRepositoryResult<()> {
        let mut attachments = self.attachments.write().map_err(|err| {
            AttachmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        // Check the whole batch before inserting anything.
        let mut seen = Vec::with_capacity(batch.len());
        for attachment in batch {
            if attachments.contains_key(&attachment.id()) || seen.contains(&attachment.id()) {
                return Err(AttachmentRepositoryError::DuplicateAttachment(attachment.id()));
            }
            seen.push(attachment.id());
        }

        for attachment in batch {
            attachments.insert(attachment.id(), attachment.clone());
        }
        Ok(())
    }

    async fn find_by_id(&self, id: AttachmentId) -> AttachmentRepositoryResult<Option<Attachment>> {
        let attachments = self.attachments.read().map_err(|err| {
            AttachmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(attachments.get(&id).cloned())
    }

    async fn list_ids_by_task(
        &self,
        task_id: TaskId,
    ) -> AttachmentRepositoryResult<Vec<AttachmentId>> {
        let attachments = self.attachments.read().map_err(|err| {
            AttachmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut ids: Vec<AttachmentId> = attachments
            .values()
            .filter(|attachment| attachment.task_id() == task_id)
            .map(Attachment::id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn delete(&self, id: AttachmentId) -> AttachmentRepositoryResult<bool> {
        let mut attachments = self.attachments.write().map_err(|err| {
            AttachmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(attachments.remove(&id).is_some())
    }

    async fn delete_by_task(&self, task_id: TaskId) -> AttachmentRepositoryResult<u64> {
        let mut attachments = self.attachments.write().map_err(|err| {
            AttachmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let before = attachments.len();
        attachments.retain(|_, attachment| attachment.task_id() != task_id);
        let removed = before.saturating_sub(attachments.len());
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}
