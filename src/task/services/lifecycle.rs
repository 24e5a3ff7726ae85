//! Task service: authorized creation, change, removal, and lookup of tasks
//! together with their attachments.

use super::{
    ConsistencyReport, CreateTaskRequest, TaskDeletion, TaskServiceError, TaskServiceResult,
    TaskValidationError, TaskView, UpdateTaskRequest,
    request::{CreateInput, UpdateInput, clears_assignment},
};
use crate::{
    access::{
        domain::{Actor, IdentityContext, UserId},
        policy::{AccessDecision, AccessPolicy, TaskAction, TaskParties, VisibilityScope},
        ports::UserDirectory,
    },
    attachment::{
        domain::AttachmentId,
        ports::AttachmentRepository,
        services::{AttachmentDownload, AttachmentStore, AttachmentStoreError},
    },
    config::ServiceConfig,
    task::{
        domain::{AssignmentChange, Task, TaskId},
        ports::TaskRepository,
    },
};
use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Task orchestration service.
///
/// Every operation starts from an [`IdentityContext`], checks the
/// [`AccessPolicy`] before writing anything, and keeps the task's attachment
/// references in step with the attachment store.
#[derive(Clone)]
pub struct TaskService<R, A, U, C>
where
    R: TaskRepository,
    A: AttachmentRepository,
    U: UserDirectory,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    attachments: AttachmentStore<A, C>,
    users: Arc<U>,
    clock: Arc<C>,
    io_timeout: Duration,
}

impl<R, A, U, C> TaskService<R, A, U, C>
where
    R: TaskRepository,
    A: AttachmentRepository,
    U: UserDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default configuration.
    #[must_use]
    pub fn new(tasks: Arc<R>, attachments: Arc<A>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self::with_config(tasks, attachments, users, clock, &ServiceConfig::default())
    }

    /// Creates a service using the limits and timeout from `config`.
    #[must_use]
    pub fn with_config(
        tasks: Arc<R>,
        attachments: Arc<A>,
        users: Arc<U>,
        clock: Arc<C>,
        config: &ServiceConfig,
    ) -> Self {
        Self {
            tasks,
            attachments: AttachmentStore::with_config(attachments, Arc::clone(&clock), config),
            users,
            clock,
            io_timeout: config.io_timeout,
        }
    }

    /// Returns the attachment store used by this service.
    #[must_use]
    pub const fn attachments(&self) -> &AttachmentStore<A, C> {
        &self.attachments
    }

    /// Creates a task owned by the acting user.
    ///
    /// Files are validated before anything is stored. Attachments are stored
    /// first under the reserved task id, then the task; when the task write
    /// fails the attachments are removed again.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Access`] without an actor,
    /// [`TaskServiceError::Validation`] or [`TaskServiceError::Attachment`]
    /// for rejected input, and [`TaskServiceError::PartialWrite`] when a
    /// failed write could not be rolled back.
    pub async fn create(
        &self,
        ctx: &IdentityContext,
        request: CreateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let actor = *ctx.require_actor()?;
        let CreateInput {
            mut draft,
            assigned_to,
            files,
        } = request.into_input(actor.id())?;
        self.attachments
            .validate_all(&files)
            .map_err(AttachmentStoreError::from)?;

        if let AssignmentChange::AssignTo(user) = self
            .resolve_assignment(&actor, &draft, assigned_to.as_deref())
            .await?
        {
            draft.assigned_to = Some(user);
        }

        draft.attachments = self
            .attachments
            .ingest_all(&files, actor.id(), draft.id)
            .await?;
        let task = Task::new(draft, &*self.clock);

        if let Err(err) = self.bounded("store", self.tasks.store(&task)).await {
            return Err(self
                .compensate("create", task.id(), task.attachment_ids(), err)
                .await);
        }

        info!(
            task_id = %task.id(),
            actor = %actor.id(),
            attachments = task.attachments().len(),
            "created task"
        );
        Ok(task)
    }

    /// Applies changes to a task the actor may update.
    ///
    /// New files are appended to the existing attachments. The write is
    /// conditional on the version loaded at the start of the call.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`],
    /// [`TaskServiceError::Forbidden`], validation errors, a repository
    /// conflict when another writer got there first, and
    /// [`TaskServiceError::PartialWrite`] when new attachments could not be
    /// rolled back.
    pub async fn update(
        &self,
        ctx: &IdentityContext,
        task_id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let actor = *ctx.require_actor()?;
        let mut task = self.load(task_id).await?;
        authorize(&actor, &task, TaskAction::Update)?;

        let UpdateInput {
            mut changes,
            assigned_to,
            files,
        } = request.into_input()?;
        self.attachments
            .validate_all(&files)
            .map_err(AttachmentStoreError::from)?;
        changes.assignment = self
            .resolve_assignment(&actor, &task, assigned_to.as_deref())
            .await?;

        let expected = task.version();
        changes.new_attachments = self
            .attachments
            .ingest_all(&files, actor.id(), task_id)
            .await?;
        let added: Vec<AttachmentId> = changes
            .new_attachments
            .iter()
            .map(|reference| reference.attachment_id)
            .collect();
        task.apply(changes, &*self.clock);

        if let Err(err) = self
            .bounded("update", self.tasks.update(&task, expected))
            .await
        {
            return Err(self.compensate("update", task_id, added, err).await);
        }

        info!(
            %task_id,
            actor = %actor.id(),
            version = %task.version(),
            added_attachments = added.len(),
            "updated task"
        );
        Ok(task)
    }

    /// Deletes a task and every attachment stored for it.
    ///
    /// Attachments go first, so an interrupted delete leaves at worst a task
    /// with dangling references that a retry finishes off.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`],
    /// [`TaskServiceError::Forbidden`], or a repository conflict when the
    /// task changed while it was being deleted.
    pub async fn delete(
        &self,
        ctx: &IdentityContext,
        task_id: TaskId,
    ) -> TaskServiceResult<TaskDeletion> {
        let actor = *ctx.require_actor()?;
        let task = self.load(task_id).await?;
        authorize(&actor, &task, TaskAction::Delete)?;

        let attachments_removed = self.attachments.delete_by_task(task_id).await?;
        self.bounded("delete", self.tasks.delete(task_id, task.version()))
            .await?;

        info!(%task_id, actor = %actor.id(), attachments_removed, "deleted task");
        Ok(TaskDeletion {
            task_id,
            attachments_removed,
        })
    }

    /// Lists the tasks visible to the actor, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Access`] without an actor and repository
    /// or directory errors.
    pub async fn list(&self, ctx: &IdentityContext) -> TaskServiceResult<Vec<TaskView>> {
        let actor = *ctx.require_actor()?;
        let tasks = self
            .bounded("list", self.tasks.list(VisibilityScope::for_actor(&actor)))
            .await?;

        let mut parties: Vec<UserId> = tasks
            .iter()
            .flat_map(|task| std::iter::once(task.owner()).chain(task.assigned_to()))
            .collect();
        parties.sort_unstable();
        parties.dedup();
        let summaries = self
            .bounded("resolve users", self.users.find_summaries(&parties))
            .await?;

        Ok(tasks
            .into_iter()
            .map(|task| TaskView::resolve(task, &summaries))
            .collect())
    }

    /// Returns one task the actor may read.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] or
    /// [`TaskServiceError::Forbidden`].
    pub async fn get(&self, ctx: &IdentityContext, task_id: TaskId) -> TaskServiceResult<TaskView> {
        let actor = *ctx.require_actor()?;
        let task = self.load(task_id).await?;
        authorize(&actor, &task, TaskAction::Read)?;

        let parties: Vec<UserId> = std::iter::once(task.owner())
            .chain(task.assigned_to())
            .collect();
        let summaries = self
            .bounded("resolve users", self.users.find_summaries(&parties))
            .await?;
        Ok(TaskView::resolve(task, &summaries))
    }

    /// Removes one attachment from a task.
    ///
    /// Authorization is checked against the owning task. The stored
    /// attachment is deleted before the reference, so an interruption
    /// leaves a dangling reference rather than a hidden blob.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`],
    /// [`TaskServiceError::Forbidden`], or
    /// [`TaskServiceError::AttachmentNotFound`] when the task does not
    /// reference the attachment.
    pub async fn delete_attachment(
        &self,
        ctx: &IdentityContext,
        task_id: TaskId,
        attachment_id: AttachmentId,
    ) -> TaskServiceResult<Task> {
        let actor = *ctx.require_actor()?;
        let mut task = self.load(task_id).await?;
        authorize(&actor, &task, TaskAction::Update)?;
        if !task.references(attachment_id) {
            return Err(TaskServiceError::AttachmentNotFound(attachment_id));
        }

        match self.attachments.retrieve(attachment_id).await {
            Ok((metadata, _)) if metadata.task_id != task_id => {
                warn!(
                    %task_id,
                    %attachment_id,
                    owning_task = %metadata.task_id,
                    "reference points at another task's attachment, pruning reference only"
                );
            }
            Ok(_) => match self.attachments.delete_one(attachment_id).await {
                Ok(()) | Err(AttachmentStoreError::NotFound(_)) => {}
                Err(err) => return Err(err.into()),
            },
            Err(AttachmentStoreError::NotFound(_)) => {
                debug!(%task_id, %attachment_id, "attachment already gone, pruning reference");
            }
            Err(err) => return Err(err.into()),
        }

        let expected = task.version();
        task.remove_attachment_ref(attachment_id, &*self.clock);
        self.bounded("update", self.tasks.update(&task, expected))
            .await?;

        info!(%task_id, %attachment_id, actor = %actor.id(), "removed attachment");
        Ok(task)
    }

    /// Returns an attachment for download if the actor may read its task.
    ///
    /// Attachments whose task no longer exists are reported as not found.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::AttachmentNotFound`] or
    /// [`TaskServiceError::Forbidden`].
    pub async fn download_attachment(
        &self,
        ctx: &IdentityContext,
        attachment_id: AttachmentId,
    ) -> TaskServiceResult<AttachmentDownload> {
        let actor = *ctx.require_actor()?;
        let (metadata, content) = match self.attachments.retrieve(attachment_id).await {
            Ok(found) => found,
            Err(AttachmentStoreError::NotFound(id)) => {
                return Err(TaskServiceError::AttachmentNotFound(id));
            }
            Err(err) => return Err(err.into()),
        };

        let task = self
            .bounded("lookup", self.tasks.find_by_id(metadata.task_id))
            .await?
            .ok_or(TaskServiceError::AttachmentNotFound(attachment_id))?;
        authorize(&actor, &task, TaskAction::Read)?;

        Ok(AttachmentDownload::new(&metadata, content))
    }

    /// Compares a task's attachment references with the stored attachments.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] or
    /// [`TaskServiceError::Forbidden`].
    pub async fn check_attachment_refs(
        &self,
        ctx: &IdentityContext,
        task_id: TaskId,
    ) -> TaskServiceResult<ConsistencyReport> {
        let actor = *ctx.require_actor()?;
        let task = self.load(task_id).await?;
        authorize(&actor, &task, TaskAction::Read)?;

        let stored = self.attachments.list_ids_by_task(task_id).await?;
        Ok(ConsistencyReport::compare(&task, &stored))
    }

    /// Prunes dangling references and deletes unreferenced attachments.
    ///
    /// Returns the inconsistencies that were repaired. The task is rewritten
    /// with a new version before any attachment is deleted, so an update
    /// still in flight against the old version conflicts and removes its own
    /// uploads instead of committing references to deleted attachments.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`],
    /// [`TaskServiceError::Forbidden`], or a repository conflict when the
    /// task changed during the repair. Nothing is deleted on conflict.
    pub async fn repair_attachment_refs(
        &self,
        ctx: &IdentityContext,
        task_id: TaskId,
    ) -> TaskServiceResult<ConsistencyReport> {
        let actor = *ctx.require_actor()?;
        let mut task = self.load(task_id).await?;
        authorize(&actor, &task, TaskAction::Update)?;

        let stored = self.attachments.list_ids_by_task(task_id).await?;
        let report = ConsistencyReport::compare(&task, &stored);
        if report.is_consistent() {
            return Ok(report);
        }

        let expected = task.version();
        if task.prune_attachment_refs(&report.dangling_refs, &*self.clock) == 0 {
            task.claim_revision(&*self.clock);
        }
        self.bounded("update", self.tasks.update(&task, expected))
            .await?;

        for attachment_id in &report.unreferenced {
            match self.attachments.delete_one(*attachment_id).await {
                Ok(()) | Err(AttachmentStoreError::NotFound(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }

        warn!(
            %task_id,
            dangling = report.dangling_refs.len(),
            unreferenced = report.unreferenced.len(),
            "repaired attachment references"
        );
        Ok(report)
    }

    async fn load(&self, task_id: TaskId) -> TaskServiceResult<Task> {
        self.bounded("lookup", self.tasks.find_by_id(task_id))
            .await?
            .ok_or(TaskServiceError::TaskNotFound(task_id))
    }

    /// Works out what an assignment value means for this actor and task.
    ///
    /// Values from actors who may not assign are dropped.
    async fn resolve_assignment(
        &self,
        actor: &Actor,
        task: &impl TaskParties,
        requested: Option<&str>,
    ) -> TaskServiceResult<AssignmentChange> {
        let Some(raw) = requested else {
            return Ok(AssignmentChange::Keep);
        };
        if !AccessPolicy::can_act(actor, task, TaskAction::Assign) {
            if !clears_assignment(raw) {
                debug!(actor = %actor.id(), "ignoring assignment from non-admin");
            }
            return Ok(AssignmentChange::Keep);
        }
        if clears_assignment(raw) {
            return Ok(AssignmentChange::Clear);
        }

        let assignee = UserId::parse(raw.trim()).map_err(TaskValidationError::from)?;
        if !self
            .bounded("resolve assignee", self.users.exists(assignee))
            .await?
        {
            return Err(TaskValidationError::UnknownAssignee(assignee).into());
        }
        Ok(AssignmentChange::AssignTo(assignee))
    }

    /// Removes attachments stored by a write that then failed.
    ///
    /// Returns the original failure when every attachment was removed, or
    /// [`TaskServiceError::PartialWrite`] naming those left behind. A timed
    /// out write may still commit, so its attachments are kept and the
    /// failure becomes [`TaskServiceError::WriteOutcomeUnknown`].
    async fn compensate(
        &self,
        operation: &'static str,
        task_id: TaskId,
        stored: Vec<AttachmentId>,
        cause: TaskServiceError,
    ) -> TaskServiceError {
        if let TaskServiceError::Timeout { limit, .. } = cause {
            warn!(
                operation,
                %task_id,
                pending = stored.len(),
                "task write timed out with unknown outcome, keeping stored attachments"
            );
            return TaskServiceError::WriteOutcomeUnknown {
                operation,
                task_id,
                pending: stored,
                limit,
            };
        }
        if stored.is_empty() {
            return cause;
        }
        warn!(
            operation,
            %task_id,
            count = stored.len(),
            error = %cause,
            "task write failed, removing stored attachments"
        );

        let mut orphaned = Vec::new();
        for attachment_id in stored {
            match self.attachments.delete_one(attachment_id).await {
                Ok(()) | Err(AttachmentStoreError::NotFound(_)) => {}
                Err(err) => {
                    warn!(%attachment_id, error = %err, "compensating delete failed");
                    orphaned.push(attachment_id);
                }
            }
        }

        if orphaned.is_empty() {
            return cause;
        }
        error!(operation, %task_id, ?orphaned, "task write left orphaned attachments");
        TaskServiceError::PartialWrite {
            operation,
            task_id,
            orphaned,
            source: Box::new(cause),
        }
    }

    async fn bounded<T, E>(
        &self,
        operation: &'static str,
        future: impl Future<Output = Result<T, E>>,
    ) -> TaskServiceResult<T>
    where
        TaskServiceError: From<E>,
    {
        tokio::time::timeout(self.io_timeout, future)
            .await
            .map_or_else(
                |_elapsed| {
                    warn!(operation, limit = ?self.io_timeout, "task port timed out");
                    Err(TaskServiceError::Timeout {
                        operation,
                        limit: self.io_timeout,
                    })
                },
                |result| result.map_err(TaskServiceError::from),
            )
    }
}

fn authorize(actor: &Actor, task: &Task, action: TaskAction) -> TaskServiceResult<()> {
    match AccessPolicy::decide(actor, task, action) {
        AccessDecision::Allow => Ok(()),
        AccessDecision::Deny(reason) => {
            warn!(task_id = %task.id(), actor = %actor.id(), %action, %reason, "access denied");
            Err(TaskServiceError::Forbidden {
                task_id: task.id(),
                action,
                reason,
            })
        }
    }
}
