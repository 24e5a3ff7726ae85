//! Attachment store tests: validation limits, batch ingestion, and removal.

use std::sync::Arc;
use std::time::Duration;

use crate::{
    access::domain::UserId,
    attachment::{
        adapters::memory::InMemoryAttachmentRepository,
        domain::{Attachment, AttachmentDomainError, AttachmentId, FileType, UploadedFile},
        ports::{
            AttachmentRepository, AttachmentRepositoryError, AttachmentRepositoryResult,
            MockAttachmentRepository,
        },
        services::{AttachmentStore, AttachmentStoreError},
    },
    config::ServiceConfig,
    error::ErrorKind,
    task::domain::TaskId,
};
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

const MIB: usize = 1024 * 1024;

type TestStore = AttachmentStore<InMemoryAttachmentRepository, DefaultClock>;

struct StoreHarness {
    store: TestStore,
    repository: Arc<InMemoryAttachmentRepository>,
}

#[fixture]
fn harness() -> StoreHarness {
    let repository = Arc::new(InMemoryAttachmentRepository::new());
    let config = ServiceConfig::default().with_locator_base_url("https://tasks.example.com");
    StoreHarness {
        store: AttachmentStore::with_config(
            Arc::clone(&repository),
            Arc::new(DefaultClock),
            &config,
        ),
        repository,
    }
}

fn pdf(name: &str, size: usize) -> UploadedFile {
    UploadedFile::new(name, "application/pdf", vec![b'%'; size])
}

#[rstest]
fn nine_mebibyte_pdf_is_accepted(harness: StoreHarness) {
    let file_type = harness
        .store
        .validate(&pdf("minutes.pdf", 9 * MIB))
        .expect("9 MiB pdf should pass");
    assert_eq!(file_type, FileType::Pdf);
}

#[rstest]
fn eleven_mebibyte_pdf_is_too_large(harness: StoreHarness) {
    let result = harness.store.validate(&pdf("scan.pdf", 11 * MIB));
    assert!(matches!(
        result,
        Err(AttachmentDomainError::PayloadTooLarge { limit_bytes, .. })
            if limit_bytes == 10 * 1024 * 1024
    ));
}

#[rstest]
#[case(UploadedFile::new("setup.exe", "application/x-msdownload", b"MZ".to_vec()))]
#[case(UploadedFile::new("setup.exe", "application/pdf", b"MZ".to_vec()))]
#[case(UploadedFile::new("notes.pdf", "text/plain", b"hi".to_vec()))]
fn unaccepted_extension_or_media_type_is_rejected(harness: StoreHarness, #[case] file: UploadedFile) {
    assert!(matches!(
        harness.store.validate(&file),
        Err(AttachmentDomainError::UnsupportedFileType { .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ingest_stores_metadata_payload_and_locator(harness: StoreHarness) {
    let task_id = TaskId::new();
    let uploader = UserId::new();
    let file = UploadedFile::new("photo.JPG", "image/jpeg", b"jpeg-bytes".to_vec());

    let reference = harness
        .store
        .ingest(&file, uploader, task_id)
        .await
        .expect("ingest should succeed");

    assert_eq!(reference.file_type, FileType::Jpeg);
    assert_eq!(reference.file_size, 10);
    assert_eq!(
        reference.storage_locator.as_str(),
        format!(
            "https://tasks.example.com/api/tasks/attachments/{}",
            reference.attachment_id
        )
    );

    let (metadata, content) = harness
        .store
        .retrieve(reference.attachment_id)
        .await
        .expect("stored attachment should be retrievable");
    assert_eq!(metadata.task_id, task_id);
    assert_eq!(metadata.uploader, uploader);
    assert_eq!(metadata.content_digest.len(), 64);
    assert_eq!(content.as_ref(), b"jpeg-bytes");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ingest_all_stores_nothing_when_any_file_is_rejected(harness: StoreHarness) {
    let files = vec![
        pdf("first.pdf", 16),
        UploadedFile::new("virus.exe", "application/octet-stream", b"MZ".to_vec()),
    ];

    let result = harness
        .store
        .ingest_all(&files, UserId::new(), TaskId::new())
        .await;

    assert!(matches!(result, Err(AttachmentStoreError::Validation(_))));
    assert!(
        harness
            .repository
            .is_empty()
            .expect("repository should be readable")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ingest_all_keeps_upload_order(harness: StoreHarness) {
    let files = vec![pdf("a.pdf", 1), pdf("b.pdf", 2), pdf("c.pdf", 3)];
    let references = harness
        .store
        .ingest_all(&files, UserId::new(), TaskId::new())
        .await
        .expect("batch should be stored");

    let names: Vec<&str> = references
        .iter()
        .map(|reference| reference.original_file_name.as_str())
        .collect();
    assert_eq!(names, ["a.pdf", "b.pdf", "c.pdf"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_by_task_only_removes_that_task(harness: StoreHarness) {
    let doomed = TaskId::new();
    let kept = TaskId::new();
    let uploader = UserId::new();
    harness
        .store
        .ingest_all(&[pdf("a.pdf", 1), pdf("b.pdf", 1)], uploader, doomed)
        .await
        .expect("first batch should be stored");
    let survivor = harness
        .store
        .ingest(&pdf("c.pdf", 1), uploader, kept)
        .await
        .expect("second task's attachment should be stored");

    let removed = harness
        .store
        .delete_by_task(doomed)
        .await
        .expect("cascade delete should succeed");

    assert_eq!(removed, 2);
    assert_eq!(
        harness
            .store
            .list_ids_by_task(doomed)
            .await
            .expect("listing should succeed"),
        Vec::<AttachmentId>::new()
    );
    assert!(harness.store.retrieve(survivor.attachment_id).await.is_ok());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_one_reports_missing_attachment(harness: StoreHarness) {
    let missing = AttachmentId::new();
    let result = harness.store.delete_one(missing).await;
    assert!(matches!(result, Err(AttachmentStoreError::NotFound(id)) if id == missing));
}

#[tokio::test(flavor = "multi_thread")]
async fn repository_failure_is_a_storage_failure() {
    let mut repository = MockAttachmentRepository::new();
    repository.expect_store_batch().returning(|_| {
        Err(AttachmentRepositoryError::persistence(std::io::Error::other(
            "disk full",
        )))
    });
    let store = AttachmentStore::new(Arc::new(repository), Arc::new(DefaultClock));

    let err = store
        .ingest(&pdf("a.pdf", 1), UserId::new(), TaskId::new())
        .await
        .expect_err("persistence failure should surface");

    assert_eq!(err.kind(), ErrorKind::StorageFailure);
    assert_eq!(err.http_status(), 500);
}

#[rstest]
fn oversized_upload_maps_to_payload_too_large_status(harness: StoreHarness) {
    let err = AttachmentStoreError::from(
        harness
            .store
            .validate(&pdf("big.pdf", 11 * MIB))
            .expect_err("oversized file should be rejected"),
    );
    assert_eq!(err.http_status(), 413);
    assert_eq!(err.kind(), ErrorKind::Validation);
}

/// Repository whose lookups never finish within the test's time budget.
struct StalledRepository;

#[async_trait]
impl AttachmentRepository for StalledRepository {
    async fn store_batch(&self, _batch: &[Attachment]) -> AttachmentRepositoryResult<()> {
        Ok(())
    }

    async fn find_by_id(&self, _id: AttachmentId) -> AttachmentRepositoryResult<Option<Attachment>> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(None)
    }

    async fn list_ids_by_task(&self, _task_id: TaskId) -> AttachmentRepositoryResult<Vec<AttachmentId>> {
        Ok(Vec::new())
    }

    async fn delete(&self, _id: AttachmentId) -> AttachmentRepositoryResult<bool> {
        Ok(false)
    }

    async fn delete_by_task(&self, _task_id: TaskId) -> AttachmentRepositoryResult<u64> {
        Ok(0)
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn stalled_repository_surfaces_timeout() {
    let config = ServiceConfig::default().with_io_timeout(Duration::from_millis(20));
    let store = AttachmentStore::with_config(
        Arc::new(StalledRepository),
        Arc::new(DefaultClock),
        &config,
    );

    let err = store
        .retrieve(AttachmentId::new())
        .await
        .expect_err("lookup should time out");

    assert!(matches!(err, AttachmentStoreError::Timeout { operation: "lookup", .. }));
    assert!(err.kind().is_retryable());
}
