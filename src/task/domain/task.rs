//! Task aggregate root and the value objects used to create and change it.

use super::{Category, TaskId, TaskStatus, TaskTitle, TaskVersion};
use crate::{
    access::{domain::UserId, policy::TaskParties},
    attachment::domain::{AttachmentId, AttachmentRef},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner: UserId,
    assigned_to: Option<UserId>,
    title: TaskTitle,
    description: Option<String>,
    category: Category,
    status: TaskStatus,
    due_date: Option<NaiveDate>,
    due_time: Option<NaiveTime>,
    attachments: Vec<AttachmentRef>,
    version: TaskVersion,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Validated input for a task that has not been stored yet.
///
/// The identifier is reserved up front so attachments can be stored against
/// it before the task itself is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Reserved task identifier.
    pub id: TaskId,
    /// Creating user.
    pub owner: UserId,
    /// Initial assignee, if any.
    pub assigned_to: Option<UserId>,
    /// Task title.
    pub title: TaskTitle,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Category label.
    pub category: Category,
    /// Initial status.
    pub status: TaskStatus,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Optional due time.
    pub due_time: Option<NaiveTime>,
    /// References to attachments already stored for the reserved id.
    pub attachments: Vec<AttachmentRef>,
}

impl TaskDraft {
    /// Creates a draft owned by `owner` with no assignee, description,
    /// due date, or attachments.
    #[must_use]
    pub fn new(owner: UserId, title: TaskTitle, category: Category) -> Self {
        Self {
            id: TaskId::new(),
            owner,
            assigned_to: None,
            title,
            description: None,
            category,
            status: TaskStatus::default(),
            due_date: None,
            due_time: None,
            attachments: Vec::new(),
        }
    }
}

impl TaskParties for TaskDraft {
    fn owner(&self) -> UserId {
        self.owner
    }

    fn assignee(&self) -> Option<UserId> {
        self.assigned_to
    }
}

/// Requested change to a task's assignee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AssignmentChange {
    /// Leave the assignee as it is.
    #[default]
    Keep,
    /// Remove the assignee.
    Clear,
    /// Hand the task to a user.
    AssignTo(UserId),
}

/// Set of field changes applied to a task as a single revision.
///
/// `None` fields keep their current value. New attachment references are
/// appended after the existing ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    /// Replacement title.
    pub title: Option<TaskTitle>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement category.
    pub category: Option<Category>,
    /// Replacement status.
    pub status: Option<TaskStatus>,
    /// Replacement due date.
    pub due_date: Option<NaiveDate>,
    /// Replacement due time.
    pub due_time: Option<NaiveTime>,
    /// Assignee change.
    pub assignment: AssignmentChange,
    /// References to newly stored attachments.
    pub new_attachments: Vec<AttachmentRef>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner.
    pub owner: UserId,
    /// Persisted assignee, if any.
    pub assigned_to: Option<UserId>,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted category.
    pub category: Category,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Persisted due time, if any.
    pub due_time: Option<NaiveTime>,
    /// Persisted attachment references.
    pub attachments: Vec<AttachmentRef>,
    /// Persisted version.
    pub version: TaskVersion,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task at [`TaskVersion::INITIAL`] from a draft.
    #[must_use]
    pub fn new(draft: TaskDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: draft.id,
            owner: draft.owner,
            assigned_to: draft.assigned_to,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            status: draft.status,
            due_date: draft.due_date,
            due_time: draft.due_time,
            attachments: draft.attachments,
            version: TaskVersion::INITIAL,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            assigned_to: data.assigned_to,
            title: data.title,
            description: data.description,
            category: data.category,
            status: data.status,
            due_date: data.due_date,
            due_time: data.due_time,
            attachments: data.attachments,
            version: data.version,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the category.
    #[must_use]
    pub const fn category(&self) -> &Category {
        &self.category
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the due time, if any.
    #[must_use]
    pub const fn due_time(&self) -> Option<NaiveTime> {
        self.due_time
    }

    /// Returns the attachment references in upload order.
    #[must_use]
    pub fn attachments(&self) -> &[AttachmentRef] {
        &self.attachments
    }

    /// Returns the current version.
    #[must_use]
    pub const fn version(&self) -> TaskVersion {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the task references the attachment.
    #[must_use]
    pub fn references(&self, attachment_id: AttachmentId) -> bool {
        self.attachments
            .iter()
            .any(|reference| reference.attachment_id == attachment_id)
    }

    /// Returns the identifiers of every referenced attachment.
    #[must_use]
    pub fn attachment_ids(&self) -> Vec<AttachmentId> {
        self.attachments
            .iter()
            .map(|reference| reference.attachment_id)
            .collect()
    }

    /// Applies a set of changes as one revision.
    pub fn apply(&mut self, changes: TaskChanges, clock: &impl Clock) {
        let TaskChanges {
            title,
            description,
            category,
            status,
            due_date,
            due_time,
            assignment,
            new_attachments,
        } = changes;

        if let Some(value) = title {
            self.title = value;
        }
        if let Some(value) = description {
            self.description = Some(value);
        }
        if let Some(value) = category {
            self.category = value;
        }
        if let Some(value) = status {
            self.status = value;
        }
        if let Some(value) = due_date {
            self.due_date = Some(value);
        }
        if let Some(value) = due_time {
            self.due_time = Some(value);
        }
        match assignment {
            AssignmentChange::Keep => {}
            AssignmentChange::Clear => self.assigned_to = None,
            AssignmentChange::AssignTo(user) => self.assigned_to = Some(user),
        }
        self.attachments.extend(new_attachments);
        self.touch(clock);
    }

    /// Removes the reference to one attachment.
    ///
    /// Returns the removed reference, or `None` without touching the task
    /// when it was not referenced.
    pub fn remove_attachment_ref(
        &mut self,
        attachment_id: AttachmentId,
        clock: &impl Clock,
    ) -> Option<AttachmentRef> {
        let position = self
            .attachments
            .iter()
            .position(|reference| reference.attachment_id == attachment_id)?;
        let removed = self.attachments.remove(position);
        self.touch(clock);
        Some(removed)
    }

    /// Drops every reference to the given attachments.
    ///
    /// Returns the number of references removed. The task is only touched
    /// when something was removed.
    pub fn prune_attachment_refs(&mut self, missing: &[AttachmentId], clock: &impl Clock) -> usize {
        let before = self.attachments.len();
        self.attachments
            .retain(|reference| !missing.contains(&reference.attachment_id));
        let removed = before - self.attachments.len();
        if removed > 0 {
            self.touch(clock);
        }
        removed
    }

    /// Bumps the version without changing any field.
    ///
    /// Writers still holding the previous version will conflict.
    pub fn claim_revision(&mut self, clock: &impl Clock) {
        self.touch(clock);
    }

    /// Records a revision: bumps the version and the modification time.
    fn touch(&mut self, clock: &impl Clock) {
        self.version = self.version.next();
        self.updated_at = clock.utc();
    }
}

impl TaskParties for Task {
    fn owner(&self) -> UserId {
        self.owner
    }

    fn assignee(&self) -> Option<UserId> {
        self.assigned_to
    }
}
