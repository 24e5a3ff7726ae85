//! Attachment ingestion, retrieval, and removal.

use super::{AttachmentDownload, AttachmentStoreError, AttachmentStoreResult};
use crate::{
    access::domain::UserId,
    attachment::{
        domain::{
            Attachment, AttachmentDomainError, AttachmentId, AttachmentMetadata, AttachmentRef,
            FileType, StorageLocator, UploadedFile,
        },
        ports::{AttachmentRepository, AttachmentRepositoryResult},
    },
    config::{ServiceConfig, UploadLimits},
    task::domain::TaskId,
};
use bytes::Bytes;
use mockable::Clock;
use sha2::{Digest, Sha256};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Validates, stores, serves, and removes attachment blobs.
#[derive(Clone)]
pub struct AttachmentStore<A, C>
where
    A: AttachmentRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<A>,
    clock: Arc<C>,
    limits: UploadLimits,
    io_timeout: Duration,
}

impl<A, C> AttachmentStore<A, C>
where
    A: AttachmentRepository,
    C: Clock + Send + Sync,
{
    /// Creates a store with default limits.
    #[must_use]
    pub fn new(repository: Arc<A>, clock: Arc<C>) -> Self {
        Self::with_config(repository, clock, &ServiceConfig::default())
    }

    /// Creates a store using the limits and timeout from `config`.
    #[must_use]
    pub fn with_config(repository: Arc<A>, clock: Arc<C>, config: &ServiceConfig) -> Self {
        Self {
            repository,
            clock,
            limits: config.upload_limits(),
            io_timeout: config.io_timeout,
        }
    }

    /// Returns the upload limits in force.
    #[must_use]
    pub const fn limits(&self) -> &UploadLimits {
        &self.limits
    }

    /// Checks a single upload against the accepted types and size limit.
    ///
    /// Both the file name's extension and the declared media type must name
    /// an accepted type. The stored type is taken from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentDomainError::UnsupportedFileType`] or
    /// [`AttachmentDomainError::PayloadTooLarge`].
    pub fn validate(&self, file: &UploadedFile) -> Result<FileType, AttachmentDomainError> {
        let by_extension = FileType::from_file_name(file.file_name());
        let by_media_type = FileType::from_media_type(file.media_type());
        let (Some(file_type), Some(_)) = (by_extension, by_media_type) else {
            return Err(AttachmentDomainError::UnsupportedFileType {
                file_name: file.file_name().to_owned(),
                media_type: file.media_type().to_owned(),
            });
        };

        if file.size_bytes() > self.limits.max_file_bytes {
            return Err(AttachmentDomainError::PayloadTooLarge {
                file_name: file.file_name().to_owned(),
                size_bytes: file.size_bytes(),
                limit_bytes: self.limits.max_file_bytes,
            });
        }

        Ok(file_type)
    }

    /// Validates every upload, failing on the first rejected file.
    ///
    /// # Errors
    ///
    /// Returns the first [`AttachmentDomainError`] encountered.
    pub fn validate_all(&self, files: &[UploadedFile]) -> Result<Vec<FileType>, AttachmentDomainError> {
        files.iter().map(|file| self.validate(file)).collect()
    }

    /// Validates and stores one upload for `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentStoreError::Validation`] for rejected uploads and
    /// repository or timeout errors when persistence fails.
    pub async fn ingest(
        &self,
        file: &UploadedFile,
        uploader: UserId,
        task_id: TaskId,
    ) -> AttachmentStoreResult<AttachmentRef> {
        let file_type = self.validate(file)?;
        let attachment = self.prepare(file, file_type, uploader, task_id);
        self.bounded(
            "store",
            self.repository.store_batch(std::slice::from_ref(&attachment)),
        )
        .await?;
        info!(%task_id, %uploader, attachment_id = %attachment.id(), "stored attachment");
        Ok(attachment.to_ref())
    }

    /// Validates every upload, then stores them all as one batch.
    ///
    /// Nothing is stored when any file is rejected. References are returned
    /// in upload order.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentStoreError::Validation`] for the first rejected
    /// upload and repository or timeout errors when persistence fails.
    pub async fn ingest_all(
        &self,
        files: &[UploadedFile],
        uploader: UserId,
        task_id: TaskId,
    ) -> AttachmentStoreResult<Vec<AttachmentRef>> {
        if files.is_empty() {
            return Ok(Vec::new());
        }
        let file_types = self.validate_all(files)?;

        let attachments: Vec<Attachment> = files
            .iter()
            .zip(file_types)
            .map(|(file, file_type)| self.prepare(file, file_type, uploader, task_id))
            .collect();

        self.bounded("store", self.repository.store_batch(&attachments))
            .await?;

        info!(
            %task_id,
            %uploader,
            count = attachments.len(),
            "stored attachments"
        );
        Ok(attachments.iter().map(Attachment::to_ref).collect())
    }

    /// Returns an attachment's metadata and payload.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentStoreError::NotFound`] when the attachment does
    /// not exist.
    pub async fn retrieve(
        &self,
        id: AttachmentId,
    ) -> AttachmentStoreResult<(AttachmentMetadata, Bytes)> {
        let attachment = self
            .bounded("lookup", self.repository.find_by_id(id))
            .await?
            .ok_or(AttachmentStoreError::NotFound(id))?;
        Ok(attachment.into_parts())
    }

    /// Returns the transport view of an attachment.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentStoreError::NotFound`] when the attachment does
    /// not exist.
    pub async fn download(&self, id: AttachmentId) -> AttachmentStoreResult<AttachmentDownload> {
        let (metadata, content) = self.retrieve(id).await?;
        Ok(AttachmentDownload::new(&metadata, content))
    }

    /// Returns the identifiers of every attachment stored for a task.
    ///
    /// # Errors
    ///
    /// Returns repository or timeout errors.
    pub async fn list_ids_by_task(&self, task_id: TaskId) -> AttachmentStoreResult<Vec<AttachmentId>> {
        self.bounded("list", self.repository.list_ids_by_task(task_id))
            .await
    }

    /// Removes every attachment owned by a task.
    ///
    /// # Errors
    ///
    /// Returns repository or timeout errors.
    pub async fn delete_by_task(&self, task_id: TaskId) -> AttachmentStoreResult<u64> {
        let removed = self
            .bounded("cascade delete", self.repository.delete_by_task(task_id))
            .await?;
        debug!(%task_id, removed, "removed task attachments");
        Ok(removed)
    }

    /// Removes one attachment.
    ///
    /// The caller is responsible for pulling the matching reference out of
    /// the owning task.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentStoreError::NotFound`] when the attachment does
    /// not exist.
    pub async fn delete_one(&self, id: AttachmentId) -> AttachmentStoreResult<()> {
        let existed = self
            .bounded("delete", self.repository.delete(id))
            .await?;
        if !existed {
            return Err(AttachmentStoreError::NotFound(id));
        }
        debug!(attachment_id = %id, "removed attachment");
        Ok(())
    }

    fn prepare(
        &self,
        file: &UploadedFile,
        file_type: FileType,
        uploader: UserId,
        task_id: TaskId,
    ) -> Attachment {
        let id = AttachmentId::new();
        let metadata = AttachmentMetadata {
            id,
            original_file_name: file.file_name().to_owned(),
            file_type,
            file_size: file.size_bytes(),
            content_digest: content_digest(file.content()),
            uploader,
            task_id,
            storage_locator: StorageLocator::for_attachment(&self.limits.locator_base_url, id),
            upload_date: self.clock.utc(),
        };
        Attachment::new(metadata, file.content().clone())
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        future: impl Future<Output = AttachmentRepositoryResult<T>>,
    ) -> AttachmentStoreResult<T> {
        tokio::time::timeout(self.io_timeout, future)
            .await
            .map_or_else(
                |_elapsed| {
                    warn!(operation, limit = ?self.io_timeout, "attachment repository timed out");
                    Err(AttachmentStoreError::Timeout {
                        operation,
                        limit: self.io_timeout,
                    })
                },
                |result| result.map_err(AttachmentStoreError::from),
            )
    }
}

/// Hex-encoded SHA-256 digest of a payload.
fn content_digest(content: &[u8]) -> String {
    format!("{:x}", Sha256::digest(content))
}
