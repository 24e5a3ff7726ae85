//! Diesel row models for user lookups.

use super::schema::users;
use diesel::prelude::*;

/// Query result row for user summaries.
///
/// Password hashes live in the same table but are never selected.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserSummaryRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Contact email address.
    pub email: String,
}
