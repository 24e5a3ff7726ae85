//! End-to-end task flows over in-memory adapters.

use super::helpers::{Deck, deck, pdf};
use rstest::rstest;
use taskdeck::{
    access::domain::{Actor, IdentityContext, UserId},
    error::ErrorKind,
    task::{
        domain::TaskStatus,
        services::{CreateTaskRequest, UpdateTaskRequest},
    },
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delegated_task_round_trip(deck: Deck) -> Result<(), eyre::Report> {
    let created = deck
        .service
        .create(
            &deck.owner_ctx(),
            CreateTaskRequest::new("Quarterly report", "Job", "Incomplete")
                .with_due_date("2026-11-30"),
        )
        .await?;
    let assigned = deck
        .service
        .update(
            &deck.admin_ctx(),
            created.id(),
            UpdateTaskRequest::new().with_assigned_to(deck.assignee.to_string()),
        )
        .await?;
    eyre::ensure!(assigned.assigned_to() == Some(deck.assignee), "assignee not set");
    eyre::ensure!(assigned.version() > created.version(), "version did not advance");

    deck.service
        .update(
            &deck.assignee_ctx(),
            created.id(),
            UpdateTaskRequest::new().with_status("in progress"),
        )
        .await?;

    let view = deck.service.get(&deck.owner_ctx(), created.id()).await?;
    eyre::ensure!(
        view.task.status() == TaskStatus::InProgress,
        "expected In Progress, found {}",
        view.task.status()
    );
    let assignee_name = view
        .assignee_summary
        .as_ref()
        .map(|user| user.name.as_str());
    eyre::ensure!(assignee_name == Some("Asa"), "assignee summary not resolved");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_is_newest_first(deck: Deck) -> Result<(), eyre::Report> {
    for title in ["first", "second", "third"] {
        deck.service
            .create(
                &deck.owner_ctx(),
                CreateTaskRequest::new(title, "Home", "Incomplete"),
            )
            .await?;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let titles: Vec<String> = deck
        .service
        .list(&deck.owner_ctx())
        .await?
        .into_iter()
        .map(|view| view.task.title().as_str().to_owned())
        .collect();
    eyre::ensure!(
        titles == ["third", "second", "first"],
        "unexpected order {titles:?}"
    );

    let assignee_view = deck.service.list(&deck.assignee_ctx()).await?;
    eyre::ensure!(assignee_view.is_empty(), "assignee sees unrelated tasks");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignee_may_delete(deck: Deck) -> Result<(), eyre::Report> {
    let task = deck
        .service
        .create(
            &deck.admin_ctx(),
            CreateTaskRequest::new("Inventory", "Job", "Incomplete")
                .with_assigned_to(deck.assignee.to_string())
                .with_files([pdf("stock.pdf")]),
        )
        .await?;
    eyre::ensure!(task.assigned_to() == Some(deck.assignee), "assignee not set");

    let deletion = deck.service.delete(&deck.assignee_ctx(), task.id()).await?;
    eyre::ensure!(deletion.task_id == task.id(), "wrong task deleted");
    eyre::ensure!(
        deletion.attachments_removed == 1,
        "expected 1 removed attachment, found {}",
        deletion.attachments_removed
    );

    let remaining = deck
        .service
        .attachments()
        .list_ids_by_task(task.id())
        .await?;
    eyre::ensure!(remaining.is_empty(), "attachments outlived their task");
    let err = deck
        .service
        .get(&deck.admin_ctx(), task.id())
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("deleted task should be gone"))?;
    eyre::ensure!(err.kind() == ErrorKind::NotFound, "unexpected error {err}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stranger_delete_is_forbidden(deck: Deck) -> Result<(), eyre::Report> {
    let task = deck
        .service
        .create(
            &deck.owner_ctx(),
            CreateTaskRequest::new("Inventory", "Job", "Incomplete").with_files([pdf("stock.pdf")]),
        )
        .await?;
    let stranger = IdentityContext::authenticated(Actor::user(UserId::new()));

    let err = deck
        .service
        .delete(&stranger, task.id())
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("stranger delete should fail"))?;
    eyre::ensure!(err.kind() == ErrorKind::Forbidden, "unexpected error {err}");

    let remaining = deck
        .service
        .attachments()
        .list_ids_by_task(task.id())
        .await?;
    eyre::ensure!(remaining.len() == 1, "refused delete removed attachments");
    deck.service.get(&deck.owner_ctx(), task.id()).await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blank_title_is_rejected(deck: Deck) -> Result<(), eyre::Report> {
    let err = deck
        .service
        .create(
            &deck.owner_ctx(),
            CreateTaskRequest::new("   ", "Job", "Incomplete"),
        )
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("blank title should be rejected"))?;
    eyre::ensure!(err.kind() == ErrorKind::Validation, "unexpected error {err}");
    eyre::ensure!(err.http_status() == 400, "unexpected status {}", err.http_status());
    Ok(())
}
