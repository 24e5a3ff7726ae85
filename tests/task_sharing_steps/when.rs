//! When steps for task sharing BDD scenarios.

use super::world::{SharingWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use taskdeck::task::services::UpdateTaskRequest;

#[when(r#""{actor}" sets the task status to "{status}""#)]
fn set_status(world: &mut SharingWorld, actor: String, status: String) -> Result<(), eyre::Report> {
    let ctx = world.context(&actor)?;
    let task_id = world.task()?.id();
    let result = run_async(world.service.update(
        &ctx,
        task_id,
        UpdateTaskRequest::new().with_status(status),
    ));
    if let Ok(task) = &result {
        world.current_task = Some(task.clone());
    }
    world.last_update_result = Some(result);
    Ok(())
}

#[when(r#""{actor}" assigns the task to "{assignee}""#)]
fn assign(world: &mut SharingWorld, actor: String, assignee: String) -> Result<(), eyre::Report> {
    let ctx = world.context(&actor)?;
    let assignee_id = world.user_id(&assignee)?;
    let task_id = world.task()?.id();
    let request = UpdateTaskRequest::new().with_assigned_to(assignee_id.to_string());
    let result = run_async(world.service.update(&ctx, task_id, request));
    if let Ok(task) = &result {
        world.current_task = Some(task.clone());
    }
    world.last_update_result = Some(result);
    Ok(())
}

#[when(r#""{actor}" removes the attachment "{file_name}""#)]
fn remove_attachment(
    world: &mut SharingWorld,
    actor: String,
    file_name: String,
) -> Result<(), eyre::Report> {
    world.remove_attachment_named(&actor, &file_name)
}

#[when(r#""{actor}" deletes the task"#)]
fn delete_task(world: &mut SharingWorld, actor: String) -> Result<(), eyre::Report> {
    let ctx = world.context(&actor)?;
    let task_id = world.task()?.id();
    run_async(world.service.delete(&ctx, task_id)).wrap_err("delete task")?;
    Ok(())
}

#[when(r#""{actor}" lists tasks"#)]
fn list_tasks(world: &mut SharingWorld, actor: String) -> Result<(), eyre::Report> {
    let ctx = world.context(&actor)?;
    let listing = run_async(world.service.list(&ctx)).wrap_err("list tasks")?;
    world.last_listing = Some(listing);
    Ok(())
}

#[when(r#""{actor}" requests task statistics"#)]
fn request_stats(world: &mut SharingWorld, actor: String) -> Result<(), eyre::Report> {
    let ctx = world.context(&actor)?;
    let stats = run_async(world.stats.summarize(&ctx)).wrap_err("summarize tasks")?;
    world.last_stats = Some(stats);
    Ok(())
}
