//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Task row used for reads, inserts, and versioned updates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Creating user.
    pub owner_id: uuid::Uuid,
    /// Optional assignee.
    pub assigned_to: Option<uuid::Uuid>,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Category label.
    pub category: String,
    /// Task status.
    pub status: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Optional due time.
    pub due_time: Option<NaiveTime>,
    /// Attachment references JSON array.
    pub attachments: Value,
    /// Optimistic concurrency version.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
