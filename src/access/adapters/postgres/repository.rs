//! `PostgreSQL` implementation of the user directory.

use super::{models::UserSummaryRow, schema::users};
use crate::access::{
    domain::{UserId, UserSummary},
    ports::{UserDirectory, UserDirectoryError, UserDirectoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use std::collections::HashMap;

/// `PostgreSQL` connection pool type used by the user directory.
pub type UserPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed user directory.
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: UserPgPool,
}

impl PostgresUserDirectory {
    /// Creates a new directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: UserPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserDirectoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserDirectoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserDirectoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserDirectoryError::persistence)?
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_summary(&self, id: UserId) -> UserDirectoryResult<Option<UserSummary>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserSummaryRow::as_select())
                .first::<UserSummaryRow>(connection)
                .optional()
                .map_err(UserDirectoryError::persistence)?;
            Ok(row.map(row_to_summary))
        })
        .await
    }

    async fn find_summaries(
        &self,
        ids: &[UserId],
    ) -> UserDirectoryResult<HashMap<UserId, UserSummary>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let lookup: Vec<uuid::Uuid> = ids.iter().map(|id| id.into_inner()).collect();
        self.run_blocking(move |connection| {
            let rows = users::table
                .filter(users::id.eq_any(lookup))
                .select(UserSummaryRow::as_select())
                .load::<UserSummaryRow>(connection)
                .map_err(UserDirectoryError::persistence)?;
            Ok(rows
                .into_iter()
                .map(row_to_summary)
                .map(|summary| (summary.id, summary))
                .collect())
        })
        .await
    }
}

fn row_to_summary(row: UserSummaryRow) -> UserSummary {
    UserSummary::new(UserId::from_uuid(row.id), row.name, row.email)
}
