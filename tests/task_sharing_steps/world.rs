//! Shared world state for task sharing BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use eyre::WrapErr;
use mockable::DefaultClock;
use rstest::fixture;
use taskdeck::{
    access::{
        adapters::memory::InMemoryUserDirectory,
        domain::{Actor, IdentityContext, UserId, UserSummary},
    },
    attachment::{adapters::memory::InMemoryAttachmentRepository, domain::UploadedFile},
    stats::{domain::CategoryStats, services::StatsAggregator},
    task::{
        adapters::memory::InMemoryTaskRepository,
        domain::Task,
        services::{TaskService, TaskServiceError, TaskView},
    },
};

/// Service type used by the BDD world.
pub type TestTaskService = TaskService<
    InMemoryTaskRepository,
    InMemoryAttachmentRepository,
    InMemoryUserDirectory,
    DefaultClock,
>;

/// Scenario world for task sharing behaviour tests.
pub struct SharingWorld {
    /// The task service under test.
    pub service: TestTaskService,
    /// Statistics over the same task repository.
    pub stats: StatsAggregator<InMemoryTaskRepository>,
    /// Directory the service resolves users against.
    pub users: Arc<InMemoryUserDirectory>,
    /// Registered actors keyed by scenario name.
    pub actors: HashMap<String, Actor>,
    /// Task the scenario is working on.
    pub current_task: Option<Task>,
    /// Result of the most recent update attempt.
    pub last_update_result: Option<Result<Task, TaskServiceError>>,
    /// Result of the most recent listing.
    pub last_listing: Option<Vec<TaskView>>,
    /// Result of the most recent statistics request.
    pub last_stats: Option<Vec<CategoryStats>>,
}

impl SharingWorld {
    /// Creates a world with no users and no tasks.
    #[must_use]
    pub fn new() -> Self {
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let users = Arc::new(InMemoryUserDirectory::new());
        let service = TaskService::new(
            Arc::clone(&tasks),
            Arc::new(InMemoryAttachmentRepository::new()),
            Arc::clone(&users),
            Arc::new(DefaultClock),
        );
        Self {
            service,
            stats: StatsAggregator::new(tasks),
            users,
            actors: HashMap::new(),
            current_task: None,
            last_update_result: None,
            last_listing: None,
            last_stats: None,
        }
    }

    /// Registers a named actor in the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory rejects the user.
    pub fn register(&mut self, name: &str, admin: bool) -> Result<(), eyre::Report> {
        let id = UserId::new();
        self.users
            .insert(UserSummary::new(id, name, format!("{name}@example.com")))
            .map_err(|err| eyre::eyre!("register {name}: {err}"))?;
        let actor = if admin { Actor::admin(id) } else { Actor::user(id) };
        self.actors.insert(name.to_owned(), actor);
        Ok(())
    }

    /// Returns the identity context of a registered actor.
    ///
    /// # Errors
    ///
    /// Returns an error if no actor with that name was registered.
    pub fn context(&self, name: &str) -> Result<IdentityContext, eyre::Report> {
        self.actors
            .get(name)
            .copied()
            .map(IdentityContext::authenticated)
            .ok_or_else(|| eyre::eyre!("unknown actor {name} in scenario world"))
    }

    /// Returns the identifier of a registered actor.
    ///
    /// # Errors
    ///
    /// Returns an error if no actor with that name was registered.
    pub fn user_id(&self, name: &str) -> Result<UserId, eyre::Report> {
        self.actors
            .get(name)
            .map(Actor::id)
            .ok_or_else(|| eyre::eyre!("unknown actor {name} in scenario world"))
    }

    /// Returns the task the scenario is working on.
    ///
    /// # Errors
    ///
    /// Returns an error if no task has been created yet.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.current_task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing current task in scenario world"))
    }

    /// Removes the current task's attachment with the given file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the task has no such attachment or the service
    /// refuses the removal.
    pub fn remove_attachment_named(
        &mut self,
        actor: &str,
        file_name: &str,
    ) -> Result<(), eyre::Report> {
        let ctx = self.context(actor)?;
        let task = self.task()?;
        let task_id = task.id();
        let attachment_id = task
            .attachments()
            .iter()
            .find(|reference| reference.original_file_name == file_name)
            .map(|reference| reference.attachment_id)
            .ok_or_else(|| eyre::eyre!("task has no attachment named {file_name}"))?;

        let updated = run_async(self.service.delete_attachment(&ctx, task_id, attachment_id))
            .wrap_err("remove attachment")?;
        self.current_task = Some(updated);
        Ok(())
    }
}

impl Default for SharingWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SharingWorld {
    SharingWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Builds a small PDF upload with the given file name.
pub fn pdf(name: &str) -> UploadedFile {
    UploadedFile::new(name, "application/pdf", b"%PDF-1.7".to_vec())
}
