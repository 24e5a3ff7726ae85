//! In-memory repository for tasks.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{
    access::policy::VisibilityScope,
    task::{
        domain::{Task, TaskId, TaskVersion},
        ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
    },
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn check_version(stored: &Task, expected: TaskVersion) -> TaskRepositoryResult<()> {
    if stored.version() == expected {
        Ok(())
    } else {
        Err(TaskRepositoryError::VersionConflict {
            task_id: stored.id(),
            expected,
            actual: stored.version(),
        })
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        if tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task, expected: TaskVersion) -> TaskRepositoryResult<()> {
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        let stored = tasks
            .get(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        check_version(stored, expected)?;
        tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let tasks = self.tasks.read().map_err(poisoned)?;
        Ok(tasks.get(&id).cloned())
    }

    async fn delete(&self, id: TaskId, expected: TaskVersion) -> TaskRepositoryResult<()> {
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        let stored = tasks.get(&id).ok_or(TaskRepositoryError::NotFound(id))?;
        check_version(stored, expected)?;
        tasks.remove(&id);
        Ok(())
    }

    async fn list(&self, scope: VisibilityScope) -> TaskRepositoryResult<Vec<Task>> {
        let tasks = self.tasks.read().map_err(poisoned)?;
        let mut visible: Vec<Task> = tasks
            .values()
            .filter(|task| scope.includes(*task))
            .cloned()
            .collect();
        visible.sort_by_key(|task| (Reverse(task.created_at()), task.id()));
        Ok(visible)
    }
}
