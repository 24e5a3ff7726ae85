//! Two-stage grouping of tasks into per-category status counts.

use crate::task::domain::{Category, Task, TaskStatus};
use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Number of tasks in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    /// Task status.
    pub status: TaskStatus,
    /// Tasks in that status.
    pub count: u64,
}

/// Status breakdown for one category.
///
/// Only statuses that occur are listed; there is no zero-fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    /// Category label.
    pub category: Category,
    /// Counts per status, in lifecycle order.
    pub statuses: Vec<StatusCount>,
    /// Sum of all status counts.
    pub total_tasks: u64,
}

impl CategoryStats {
    fn empty(category: Category) -> Self {
        Self {
            category,
            statuses: Vec::new(),
            total_tasks: 0,
        }
    }
}

/// Groups tasks by category and status.
///
/// Categories appear in the order they are first seen; statuses within a
/// category follow [`TaskStatus`] lifecycle order.
///
/// # Examples
///
/// ```
/// use taskdeck::stats::domain::summarize_tasks;
///
/// assert!(summarize_tasks(&[]).is_empty());
/// ```
#[must_use]
pub fn summarize_tasks(tasks: &[Task]) -> Vec<CategoryStats> {
    regroup_by_category(count_by_category_and_status(tasks))
}

/// First stage: counts per `(category, status)` pair, in first-seen order.
fn count_by_category_and_status(tasks: &[Task]) -> Vec<(Category, TaskStatus, u64)> {
    let mut slots: HashMap<(&Category, TaskStatus), usize> = HashMap::new();
    let mut counts: Vec<(Category, TaskStatus, u64)> = Vec::new();

    for task in tasks {
        match slots.entry((task.category(), task.status())) {
            Entry::Occupied(slot) => {
                if let Some((_, _, count)) = counts.get_mut(*slot.get()) {
                    *count += 1;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(counts.len());
                counts.push((task.category().clone(), task.status(), 1));
            }
        }
    }
    counts
}

/// Second stage: folds the pair counts into one entry per category.
fn regroup_by_category(pairs: Vec<(Category, TaskStatus, u64)>) -> Vec<CategoryStats> {
    let mut slots: HashMap<Category, usize> = HashMap::new();
    let mut stats: Vec<CategoryStats> = Vec::new();

    for (category, status, count) in pairs {
        let slot = *slots.entry(category.clone()).or_insert_with(|| {
            stats.push(CategoryStats::empty(category));
            stats.len() - 1
        });
        if let Some(entry) = stats.get_mut(slot) {
            entry.statuses.push(StatusCount { status, count });
            entry.total_tasks += count;
        }
    }

    for entry in &mut stats {
        entry.statuses.sort_by_key(|status_count| status_count.status);
    }
    stats
}
