//! Statistics computed over tasks created through the service.

use super::helpers::{Deck, deck};
use rstest::rstest;
use taskdeck::{
    error::ErrorKind,
    task::{domain::TaskStatus, services::CreateTaskRequest},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn totals_match_visible_tasks(deck: Deck) -> Result<(), eyre::Report> {
    for (title, category, status) in [
        ("a", "Job", "Completed"),
        ("b", "Home", "Incomplete"),
        ("c", "Job", "In Progress"),
        ("d", "Job", "Completed"),
    ] {
        deck.service
            .create(
                &deck.owner_ctx(),
                CreateTaskRequest::new(title, category, status),
            )
            .await?;
    }

    let stats = deck.stats.summarize(&deck.owner_ctx()).await?;
    let mut categories: Vec<&str> = stats.iter().map(|entry| entry.category.as_str()).collect();
    categories.sort_unstable();
    eyre::ensure!(categories == ["Home", "Job"], "unexpected categories {categories:?}");

    let visible = deck.service.list(&deck.owner_ctx()).await?;
    let total: u64 = stats.iter().map(|entry| entry.total_tasks).sum();
    eyre::ensure!(
        usize::try_from(total)? == visible.len(),
        "statistics and listing disagree"
    );

    let job = stats
        .iter()
        .find(|entry| entry.category.as_str() == "Job")
        .ok_or_else(|| eyre::eyre!("missing Job statistics"))?;
    let completed = job
        .statuses
        .iter()
        .find(|entry| entry.status == TaskStatus::Completed)
        .map_or(0, |entry| entry.count);
    eyre::ensure!(completed == 2, "expected 2 completed, found {completed}");

    let assignee_stats = deck.stats.summarize(&deck.assignee_ctx()).await?;
    eyre::ensure!(assignee_stats.is_empty(), "assignee sees unrelated tasks");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn anonymous_statistics_are_refused(deck: Deck) -> Result<(), eyre::Report> {
    let err = deck
        .stats
        .summarize(&taskdeck::access::domain::IdentityContext::anonymous())
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("anonymous request should fail"))?;
    eyre::ensure!(err.kind() == ErrorKind::Unauthenticated, "unexpected error {err}");
    Ok(())
}
