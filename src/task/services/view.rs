//! Read models returned by the task service.

use crate::{
    access::domain::{UserId, UserSummary},
    attachment::domain::AttachmentId,
    task::domain::{Task, TaskId},
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A task with its owner and assignee resolved for display.
///
/// Summaries are `None` when the user directory does not know the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    /// The task itself.
    #[serde(flatten)]
    pub task: Task,
    /// Owner display data.
    pub owner_summary: Option<UserSummary>,
    /// Assignee display data.
    pub assignee_summary: Option<UserSummary>,
}

impl TaskView {
    /// Builds a view, looking the parties up in `summaries`.
    #[must_use]
    pub fn resolve(task: Task, summaries: &HashMap<UserId, UserSummary>) -> Self {
        let owner_summary = summaries.get(&task.owner()).cloned();
        let assignee_summary = task
            .assigned_to()
            .and_then(|assignee| summaries.get(&assignee))
            .cloned();
        Self {
            task,
            owner_summary,
            assignee_summary,
        }
    }
}

/// Outcome of a task deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskDeletion {
    /// Deleted task.
    pub task_id: TaskId,
    /// Number of attachments removed with it.
    pub attachments_removed: u64,
}

/// Differences between a task's attachment references and the attachments
/// actually stored for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    /// Task that was checked.
    pub task_id: TaskId,
    /// Referenced by the task but not stored.
    pub dangling_refs: Vec<AttachmentId>,
    /// Stored for the task but not referenced by it.
    pub unreferenced: Vec<AttachmentId>,
}

impl ConsistencyReport {
    /// Compares the task's references with the stored attachment ids.
    #[must_use]
    pub fn compare(task: &Task, stored: &[AttachmentId]) -> Self {
        let stored_set: HashSet<AttachmentId> = stored.iter().copied().collect();
        let referenced = task.attachment_ids();
        let referenced_set: HashSet<AttachmentId> = referenced.iter().copied().collect();

        let dangling_refs = referenced
            .into_iter()
            .filter(|id| !stored_set.contains(id))
            .collect();
        let unreferenced = stored
            .iter()
            .copied()
            .filter(|id| !referenced_set.contains(id))
            .collect();

        Self {
            task_id: task.id(),
            dangling_refs,
            unreferenced,
        }
    }

    /// Returns whether references and storage agree.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.dangling_refs.is_empty() && self.unreferenced.is_empty()
    }
}
