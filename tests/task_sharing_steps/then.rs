//! Then steps for task sharing BDD scenarios.

use super::world::{SharingWorld, run_async};
use rstest_bdd_macros::then;
use taskdeck::{
    access::domain::{Actor, IdentityContext},
    stats::domain::CategoryStats,
    task::{domain::TaskStatus, services::TaskServiceError},
};

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &SharingWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let task = world.task()?;
    let ctx = IdentityContext::authenticated(Actor::user(task.owner()));
    let stored = run_async(world.service.get(&ctx, task.id()))
        .map_err(|err| eyre::eyre!("lookup failed: {err}"))?;

    eyre::ensure!(
        stored.task.status() == expected,
        "expected status {expected}, found {}",
        stored.task.status()
    );
    Ok(())
}

#[then("the last change was refused as forbidden")]
fn last_change_forbidden(world: &SharingWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_update_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing update result in scenario world"))?;
    eyre::ensure!(
        matches!(result, Err(TaskServiceError::Forbidden { .. })),
        "expected a forbidden error, got {result:?}"
    );
    Ok(())
}

#[then("the task has no assignee")]
fn task_unassigned(world: &SharingWorld) -> Result<(), eyre::Report> {
    let task = world.task()?;
    eyre::ensure!(
        task.assigned_to().is_none(),
        "expected no assignee, found {:?}",
        task.assigned_to()
    );
    Ok(())
}

#[then(r#"the task references only the attachment "{file_name}""#)]
fn references_only(world: &SharingWorld, file_name: String) -> Result<(), eyre::Report> {
    let names: Vec<&str> = world
        .task()?
        .attachments()
        .iter()
        .map(|reference| reference.original_file_name.as_str())
        .collect();
    eyre::ensure!(
        names == [file_name.as_str()],
        "expected only {file_name}, found {names:?}"
    );
    Ok(())
}

#[then("the attachment store holds {count:usize} file for the task")]
fn store_holds_one(world: &SharingWorld, count: usize) -> Result<(), eyre::Report> {
    assert_stored_count(world, count)
}

#[then("the attachment store holds {count:usize} files for the task")]
fn store_holds_many(world: &SharingWorld, count: usize) -> Result<(), eyre::Report> {
    assert_stored_count(world, count)
}

fn assert_stored_count(world: &SharingWorld, count: usize) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let stored = run_async(world.service.attachments().list_ids_by_task(task_id))
        .map_err(|err| eyre::eyre!("attachment listing failed: {err}"))?;
    eyre::ensure!(
        stored.len() == count,
        "expected {count} stored attachments, found {}",
        stored.len()
    );
    Ok(())
}

#[then(r#"the listing contains only "{title}""#)]
fn listing_contains_only(world: &SharingWorld, title: String) -> Result<(), eyre::Report> {
    let listing = world
        .last_listing
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing listing in scenario world"))?;
    let titles: Vec<&str> = listing.iter().map(|view| view.task.title().as_str()).collect();
    eyre::ensure!(
        titles == [title.as_str()],
        "expected only {title}, found {titles:?}"
    );
    Ok(())
}

fn category<'a>(world: &'a SharingWorld, name: &str) -> Result<&'a CategoryStats, eyre::Report> {
    world
        .last_stats
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing statistics in scenario world"))?
        .iter()
        .find(|stats| stats.category.as_str() == name)
        .ok_or_else(|| eyre::eyre!("no statistics for category {name}"))
}

#[then(r#"category "{name}" has {count:u64} tasks with status "{status}""#)]
fn category_status_count(
    world: &SharingWorld,
    name: String,
    count: u64,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let found = category(world, &name)?
        .statuses
        .iter()
        .find(|entry| entry.status == expected)
        .map_or(0, |entry| entry.count);
    eyre::ensure!(
        found == count,
        "expected {count} {status} tasks in {name}, found {found}"
    );
    Ok(())
}

#[then(r#"category "{name}" has {count:u64} tasks in total"#)]
fn category_total(world: &SharingWorld, name: String, count: u64) -> Result<(), eyre::Report> {
    let total = category(world, &name)?.total_tasks;
    eyre::ensure!(total == count, "expected {count} tasks in {name}, found {total}");
    Ok(())
}
