//! `PostgreSQL` repository implementation for attachment storage.

use super::{models::AttachmentRow, schema::attachments};
use crate::{
    access::domain::UserId,
    attachment::{
        domain::{
            Attachment, AttachmentId, AttachmentMetadata, FileType, PersistedAttachmentData,
            StorageLocator,
        },
        ports::{AttachmentRepository, AttachmentRepositoryError, AttachmentRepositoryResult},
    },
    task::domain::TaskId,
};
use async_trait::async_trait;
use bytes::Bytes;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by attachment adapters.
pub type AttachmentPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed attachment repository.
#[derive(Debug, Clone)]
pub struct PostgresAttachmentRepository {
    pool: AttachmentPgPool,
}

impl PostgresAttachmentRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: AttachmentPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AttachmentRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AttachmentRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(AttachmentRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(AttachmentRepositoryError::persistence)?
    }
}

#[async_trait]
impl AttachmentRepository for PostgresAttachmentRepository {
    async fn store_batch(&self, batch: &[Attachment]) -> AttachmentRepositoryResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let rows = batch
            .iter()
            .map(to_row)
            .collect::<AttachmentRepositoryResult<Vec<_>>>()?;

        let ids: Vec<uuid::Uuid> = rows.iter().map(|row| row.id).collect();

        self.run_blocking(move |connection| {
            connection.transaction(|tx| {
                // The pre-check names the clashing identifier; the primary key
                // still guards the window between check and insert.
                let existing = attachments::table
                    .filter(attachments::id.eq_any(ids))
                    .select(attachments::id)
                    .first::<uuid::Uuid>(tx)
                    .optional()
                    .map_err(AttachmentRepositoryError::persistence)?;
                if let Some(id) = existing {
                    return Err(AttachmentRepositoryError::DuplicateAttachment(
                        AttachmentId::from_uuid(id),
                    ));
                }

                diesel::insert_into(attachments::table)
                    .values(&rows)
                    .execute(tx)
                    .map_err(AttachmentRepositoryError::persistence)?;
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: AttachmentId) -> AttachmentRepositoryResult<Option<Attachment>> {
        self.run_blocking(move |connection| {
            let row = attachments::table
                .filter(attachments::id.eq(id.into_inner()))
                .select(AttachmentRow::as_select())
                .first::<AttachmentRow>(connection)
                .optional()
                .map_err(AttachmentRepositoryError::persistence)?;
            row.map(row_to_attachment).transpose()
        })
        .await
    }

    async fn list_ids_by_task(
        &self,
        task_id: TaskId,
    ) -> AttachmentRepositoryResult<Vec<AttachmentId>> {
        self.run_blocking(move |connection| {
            let ids = attachments::table
                .filter(attachments::task_id.eq(task_id.into_inner()))
                .select(attachments::id)
                .order(attachments::id.asc())
                .load::<uuid::Uuid>(connection)
                .map_err(AttachmentRepositoryError::persistence)?;
            Ok(ids.into_iter().map(AttachmentId::from_uuid).collect())
        })
        .await
    }

    async fn delete(&self, id: AttachmentId) -> AttachmentRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let removed =
                diesel::delete(attachments::table.filter(attachments::id.eq(id.into_inner())))
                    .execute(connection)
                    .map_err(AttachmentRepositoryError::persistence)?;
            Ok(removed > 0)
        })
        .await
    }

    async fn delete_by_task(&self, task_id: TaskId) -> AttachmentRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                attachments::table.filter(attachments::task_id.eq(task_id.into_inner())),
            )
            .execute(connection)
            .map_err(AttachmentRepositoryError::persistence)?;
            u64::try_from(removed).map_err(AttachmentRepositoryError::persistence)
        })
        .await
    }
}

impl From<diesel::result::Error> for AttachmentRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

fn to_row(attachment: &Attachment) -> AttachmentRepositoryResult<AttachmentRow> {
    let metadata = attachment.metadata();
    let file_size =
        i64::try_from(metadata.file_size).map_err(AttachmentRepositoryError::persistence)?;

    Ok(AttachmentRow {
        id: metadata.id.into_inner(),
        task_id: metadata.task_id.into_inner(),
        uploader_id: metadata.uploader.into_inner(),
        original_file_name: metadata.original_file_name.clone(),
        file_type: metadata.file_type.as_str().to_owned(),
        file_size,
        content_digest: metadata.content_digest.clone(),
        storage_locator: metadata.storage_locator.as_str().to_owned(),
        content: attachment.content().to_vec(),
        upload_date: metadata.upload_date,
    })
}

fn row_to_attachment(row: AttachmentRow) -> AttachmentRepositoryResult<Attachment> {
    let AttachmentRow {
        id,
        task_id,
        uploader_id,
        original_file_name,
        file_type: persisted_file_type,
        file_size: persisted_file_size,
        content_digest,
        storage_locator,
        content,
        upload_date,
    } = row;

    let file_type = FileType::try_from(persisted_file_type.as_str())
        .map_err(AttachmentRepositoryError::persistence)?;
    let file_size =
        u64::try_from(persisted_file_size).map_err(AttachmentRepositoryError::persistence)?;

    let metadata = AttachmentMetadata {
        id: AttachmentId::from_uuid(id),
        original_file_name,
        file_type,
        file_size,
        content_digest,
        uploader: UserId::from_uuid(uploader_id),
        task_id: TaskId::from_uuid(task_id),
        storage_locator: StorageLocator::from_persisted(storage_locator),
        upload_date,
    };
    Ok(Attachment::from_persisted(PersistedAttachmentData {
        metadata,
        content: Bytes::from(content),
    }))
}
