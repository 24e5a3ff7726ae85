//! Attachment flows: upload with a task, download, and cascade removal.

use super::helpers::{Deck, deck, pdf};
use rstest::rstest;
use taskdeck::{
    attachment::domain::UploadedFile,
    error::ErrorKind,
    task::services::{CreateTaskRequest, UpdateTaskRequest},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn uploads_are_downloadable_by_participants(deck: Deck) -> Result<(), eyre::Report> {
    let task = deck
        .service
        .create(
            &deck.owner_ctx(),
            CreateTaskRequest::new("Receipts", "Home", "Incomplete").with_files([
                pdf("march.pdf"),
                UploadedFile::new("shop.png", "image/png", b"\x89PNG".to_vec()),
            ]),
        )
        .await?;
    let [first, second] = task.attachments() else {
        eyre::bail!("expected two attachments, found {}", task.attachments().len());
    };
    eyre::ensure!(first.original_file_name == "march.pdf", "upload order lost");

    let download = deck
        .service
        .download_attachment(&deck.owner_ctx(), second.attachment_id)
        .await?;
    eyre::ensure!(download.content_type == "image/png", "wrong content type");
    eyre::ensure!(download.content.as_ref() == b"\x89PNG", "wrong content");

    let err = deck
        .service
        .download_attachment(&deck.assignee_ctx(), first.attachment_id)
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("non-participant download should fail"))?;
    eyre::ensure!(err.kind() == ErrorKind::Forbidden, "unexpected error {err}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_appends_attachments(deck: Deck) -> Result<(), eyre::Report> {
    let task = deck
        .service
        .create(
            &deck.owner_ctx(),
            CreateTaskRequest::new("Receipts", "Home", "Incomplete").with_files([pdf("a.pdf")]),
        )
        .await?;

    let updated = deck
        .service
        .update(
            &deck.owner_ctx(),
            task.id(),
            UpdateTaskRequest::new().with_files([pdf("b.pdf")]),
        )
        .await?;
    eyre::ensure!(updated.attachments().len() == 2, "attachment not appended");

    let report = deck
        .service
        .check_attachment_refs(&deck.owner_ctx(), task.id())
        .await?;
    eyre::ensure!(report.is_consistent(), "unexpected drift {report:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_task_removes_its_attachments(deck: Deck) -> Result<(), eyre::Report> {
    let task = deck
        .service
        .create(
            &deck.owner_ctx(),
            CreateTaskRequest::new("Receipts", "Home", "Incomplete")
                .with_files([pdf("a.pdf"), pdf("b.pdf")]),
        )
        .await?;

    let deletion = deck.service.delete(&deck.owner_ctx(), task.id()).await?;
    eyre::ensure!(
        deletion.attachments_removed == 2,
        "expected 2 removed, found {}",
        deletion.attachments_removed
    );
    let remaining = deck
        .service
        .attachments()
        .list_ids_by_task(task.id())
        .await?;
    eyre::ensure!(remaining.is_empty(), "attachments outlived their task");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn oversized_upload_leaves_no_task(deck: Deck) -> Result<(), eyre::Report> {
    let err = deck
        .service
        .create(
            &deck.owner_ctx(),
            CreateTaskRequest::new("Scans", "Job", "Incomplete").with_files([UploadedFile::new(
                "scan.pdf",
                "application/pdf",
                vec![0; 11 * 1024 * 1024],
            )]),
        )
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("oversized upload should be rejected"))?;
    eyre::ensure!(err.http_status() == 413, "unexpected status {}", err.http_status());

    let listed = deck.service.list(&deck.owner_ctx()).await?;
    eyre::ensure!(listed.is_empty(), "rejected create left a task behind");
    Ok(())
}
