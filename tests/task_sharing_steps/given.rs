//! Given steps for task sharing BDD scenarios.

use super::world::{SharingWorld, pdf, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskdeck::task::services::{CreateTaskRequest, UpdateTaskRequest};

#[given(r#"a user "{name}""#)]
fn a_user(world: &mut SharingWorld, name: String) -> Result<(), eyre::Report> {
    world.register(&name, false)
}

#[given(r#"an administrator "{name}""#)]
fn an_administrator(world: &mut SharingWorld, name: String) -> Result<(), eyre::Report> {
    world.register(&name, true)
}

#[given(r#""{owner}" owns a task "{title}" in category "{category}""#)]
fn owns_a_task(
    world: &mut SharingWorld,
    owner: String,
    title: String,
    category: String,
) -> Result<(), eyre::Report> {
    let ctx = world.context(&owner)?;
    let request = CreateTaskRequest::new(title, category, "Incomplete");
    let task = run_async(world.service.create(&ctx, request)).wrap_err("create task")?;
    world.current_task = Some(task);
    Ok(())
}

#[given(r#""{owner}" owns a task "{title}" with attachments "{first}" and "{second}""#)]
fn owns_a_task_with_attachments(
    world: &mut SharingWorld,
    owner: String,
    title: String,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let ctx = world.context(&owner)?;
    let request = CreateTaskRequest::new(title, "Home", "Incomplete")
        .with_files([pdf(&first), pdf(&second)]);
    let task =
        run_async(world.service.create(&ctx, request)).wrap_err("create task with attachments")?;
    world.current_task = Some(task);
    Ok(())
}

#[given(r#""{owner}" owns tasks in category "{category}" with statuses "{statuses}""#)]
fn owns_tasks_with_statuses(
    world: &mut SharingWorld,
    owner: String,
    category: String,
    statuses: String,
) -> Result<(), eyre::Report> {
    let ctx = world.context(&owner)?;
    for (index, status) in statuses.split(',').enumerate() {
        let request =
            CreateTaskRequest::new(format!("Task {index}"), category.as_str(), status.trim());
        run_async(world.service.create(&ctx, request))
            .wrap_err_with(|| format!("create task with status {status}"))?;
    }
    Ok(())
}

#[given(r#""{admin}" assigns the task to "{assignee}""#)]
fn admin_assigns(
    world: &mut SharingWorld,
    admin: String,
    assignee: String,
) -> Result<(), eyre::Report> {
    let ctx = world.context(&admin)?;
    let assignee_id = world.user_id(&assignee)?;
    let task_id = world.task()?.id();
    let request = UpdateTaskRequest::new().with_assigned_to(assignee_id.to_string());
    let task =
        run_async(world.service.update(&ctx, task_id, request)).wrap_err("assign the task")?;
    world.current_task = Some(task);
    Ok(())
}

#[given(r#""{actor}" has removed the attachment "{file_name}""#)]
fn attachment_already_removed(
    world: &mut SharingWorld,
    actor: String,
    file_name: String,
) -> Result<(), eyre::Report> {
    world.remove_attachment_named(&actor, &file_name)
}
