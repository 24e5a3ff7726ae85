//! Actor-scoped statistics over the task repository.

use super::{StatsError, StatsResult};
use crate::{
    access::{domain::IdentityContext, policy::VisibilityScope},
    config::ServiceConfig,
    stats::domain::{CategoryStats, summarize_tasks},
    task::ports::TaskRepository,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Computes per-category statistics over the tasks an actor can see.
///
/// Uses the same [`VisibilityScope`] as task listing, so the totals always
/// add up to the length of the actor's task list.
#[derive(Clone)]
pub struct StatsAggregator<R>
where
    R: TaskRepository,
{
    tasks: Arc<R>,
    io_timeout: Duration,
}

impl<R> StatsAggregator<R>
where
    R: TaskRepository,
{
    /// Creates an aggregator with the default I/O timeout.
    #[must_use]
    pub fn new(tasks: Arc<R>) -> Self {
        Self::with_config(tasks, &ServiceConfig::default())
    }

    /// Creates an aggregator using the timeout from `config`.
    #[must_use]
    pub const fn with_config(tasks: Arc<R>, config: &ServiceConfig) -> Self {
        Self {
            tasks,
            io_timeout: config.io_timeout,
        }
    }

    /// Summarizes the actor's visible tasks by category and status.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Access`] without an actor, and repository or
    /// timeout errors when the tasks cannot be loaded.
    pub async fn summarize(&self, ctx: &IdentityContext) -> StatsResult<Vec<CategoryStats>> {
        let actor = ctx.require_actor()?;
        let scope = VisibilityScope::for_actor(actor);

        let tasks = tokio::time::timeout(self.io_timeout, self.tasks.list(scope))
            .await
            .map_err(|_elapsed| {
                warn!(limit = ?self.io_timeout, "task listing timed out");
                StatsError::Timeout {
                    limit: self.io_timeout,
                }
            })??;

        let stats = summarize_tasks(&tasks);
        debug!(
            actor = %actor.id(),
            tasks = tasks.len(),
            categories = stats.len(),
            "summarized tasks"
        );
        Ok(stats)
    }
}
