//! `PostgreSQL` repository implementation for task storage.

use super::{models::TaskRow, schema::tasks};
use crate::{
    access::{domain::UserId, policy::VisibilityScope},
    attachment::domain::AttachmentRef,
    task::{
        domain::{Category, PersistedTaskData, Task, TaskId, TaskStatus, TaskTitle, TaskVersion},
        ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::time::Duration;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
    statement_timeout: Option<Duration>,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self {
            pool,
            statement_timeout: None,
        }
    }

    /// Bounds every write on the server side.
    ///
    /// Writes run with `SET LOCAL statement_timeout`, so a write that
    /// exceeds `limit` is rolled back by `PostgreSQL` rather than committing
    /// after the caller gave up. Keep `limit` below the service I/O timeout.
    #[must_use]
    pub const fn with_statement_timeout(mut self, limit: Duration) -> Self {
        self.statement_timeout = Some(limit);
        self
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task)?;

        let limit = self.statement_timeout;

        self.run_blocking(move |connection| {
            connection.transaction(|tx| {
                bound_statements(tx, limit)?;
                diesel::insert_into(tasks::table)
                    .values(&row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            TaskRepositoryError::DuplicateTask(task_id)
                        }
                        _ => TaskRepositoryError::persistence(err),
                    })?;
                Ok(())
            })
        })
        .await
    }

    async fn update(&self, task: &Task, expected: TaskVersion) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task)?;
        let expected_value = version_to_db(expected)?;
        let limit = self.statement_timeout;

        self.run_blocking(move |connection| {
            connection.transaction(|tx| {
                bound_statements(tx, limit)?;
                let updated = diesel::update(
                    tasks::table
                        .filter(tasks::id.eq(task_id.into_inner()))
                        .filter(tasks::version.eq(expected_value)),
                )
                .set(&row)
                .execute(tx)?;
                if updated > 0 {
                    return Ok(());
                }
                Err(missed_write(tx, task_id, expected)?)
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn delete(&self, id: TaskId, expected: TaskVersion) -> TaskRepositoryResult<()> {
        let expected_value = version_to_db(expected)?;
        let limit = self.statement_timeout;

        self.run_blocking(move |connection| {
            connection.transaction(|tx| {
                bound_statements(tx, limit)?;
                let removed = diesel::delete(
                    tasks::table
                        .filter(tasks::id.eq(id.into_inner()))
                        .filter(tasks::version.eq(expected_value)),
                )
                .execute(tx)?;
                if removed > 0 {
                    return Ok(());
                }
                Err(missed_write(tx, id, expected)?)
            })
        })
        .await
    }

    async fn list(&self, scope: VisibilityScope) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let mut query = tasks::table.select(TaskRow::as_select()).into_boxed();
            if let VisibilityScope::Participant(user) = scope {
                let participant = user.into_inner();
                query = query.filter(
                    tasks::owner_id
                        .eq(participant)
                        .or(tasks::assigned_to.eq(participant)),
                );
            }
            let rows = query
                .order((tasks::created_at.desc(), tasks::id.asc()))
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// Applies the server-side statement timeout to the current transaction.
fn bound_statements(
    connection: &mut PgConnection,
    limit: Option<Duration>,
) -> TaskRepositoryResult<()> {
    if let Some(duration) = limit {
        diesel::sql_query(statement_timeout_sql(duration)).execute(connection)?;
    }
    Ok(())
}

/// `SET LOCAL` only lasts until the enclosing transaction ends.
fn statement_timeout_sql(limit: Duration) -> String {
    format!("SET LOCAL statement_timeout = {}", limit.as_millis().max(1))
}

/// Explains why a version-guarded write touched no rows.
fn missed_write(
    connection: &mut PgConnection,
    task_id: TaskId,
    expected: TaskVersion,
) -> TaskRepositoryResult<TaskRepositoryError> {
    let stored = tasks::table
        .filter(tasks::id.eq(task_id.into_inner()))
        .select(tasks::version)
        .first::<i64>(connection)
        .optional()?;
    match stored {
        None => Ok(TaskRepositoryError::NotFound(task_id)),
        Some(actual) => Ok(TaskRepositoryError::VersionConflict {
            task_id,
            expected,
            actual: version_from_db(actual)?,
        }),
    }
}

fn version_to_db(version: TaskVersion) -> TaskRepositoryResult<i64> {
    i64::try_from(version.value()).map_err(TaskRepositoryError::persistence)
}

fn version_from_db(value: i64) -> TaskRepositoryResult<TaskVersion> {
    u64::try_from(value)
        .map(TaskVersion::new)
        .map_err(TaskRepositoryError::persistence)
}

fn to_row(task: &Task) -> TaskRepositoryResult<TaskRow> {
    let attachments =
        serde_json::to_value(task.attachments()).map_err(TaskRepositoryError::persistence)?;

    Ok(TaskRow {
        id: task.id().into_inner(),
        owner_id: task.owner().into_inner(),
        assigned_to: task.assigned_to().map(UserId::into_inner),
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        category: task.category().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        due_date: task.due_date(),
        due_time: task.due_time(),
        attachments,
        version: version_to_db(task.version())?,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        owner_id,
        assigned_to,
        title: persisted_title,
        description,
        category: persisted_category,
        status: persisted_status,
        due_date,
        due_time,
        attachments: persisted_attachments,
        version: persisted_version,
        created_at,
        updated_at,
    } = row;

    let title = TaskTitle::new(persisted_title).map_err(TaskRepositoryError::persistence)?;
    let category = Category::new(persisted_category).map_err(TaskRepositoryError::persistence)?;
    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let attachments = serde_json::from_value::<Vec<AttachmentRef>>(persisted_attachments)
        .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        owner: UserId::from_uuid(owner_id),
        assigned_to: assigned_to.map(UserId::from_uuid),
        title,
        description,
        category,
        status,
        due_date,
        due_time,
        attachments,
        version: version_from_db(persisted_version)?,
        created_at,
        updated_at,
    }))
}
