//! Diesel schema for task persistence.

diesel::table! {
    /// Task records with embedded attachment references.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Creating user.
        owner_id -> Uuid,
        /// Optional assignee.
        assigned_to -> Nullable<Uuid>,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Category label.
        #[max_length = 255]
        category -> Varchar,
        /// Task status.
        #[max_length = 50]
        status -> Varchar,
        /// Optional due date.
        due_date -> Nullable<Date>,
        /// Optional due time.
        due_time -> Nullable<Time>,
        /// Attachment references as a JSON array.
        attachments -> Jsonb,
        /// Optimistic concurrency version.
        version -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
