//! Request payloads for task writes and their parsing into domain values.

use super::TaskValidationError;
use crate::{
    access::domain::UserId,
    attachment::domain::UploadedFile,
    task::domain::{Category, TaskChanges, TaskDraft, TaskStatus, TaskTitle},
};
use chrono::{DateTime, NaiveDate, NaiveTime};

/// Assignment values that mean "no assignee" when sent by web clients.
const CLEARING_SENTINELS: [&str; 2] = ["null", "undefined"];

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    category: String,
    status: String,
    description: Option<String>,
    due_date: Option<String>,
    due_time: Option<String>,
    assigned_to: Option<String>,
    files: Vec<UploadedFile>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            status: status.into(),
            description: None,
            due_date: None,
            due_time: None,
            assigned_to: None,
            files: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due date (`YYYY-MM-DD` or an RFC 3339 timestamp).
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Sets the due time (`HH:MM` or `HH:MM:SS`).
    #[must_use]
    pub fn with_due_time(mut self, due_time: impl Into<String>) -> Self {
        self.due_time = Some(due_time.into());
        self
    }

    /// Sets the requested assignee.
    #[must_use]
    pub fn with_assigned_to(mut self, assigned_to: impl Into<String>) -> Self {
        self.assigned_to = Some(assigned_to.into());
        self
    }

    /// Adds uploaded files.
    #[must_use]
    pub fn with_files(mut self, files: impl IntoIterator<Item = UploadedFile>) -> Self {
        self.files.extend(files);
        self
    }

    /// Parses the request into a draft owned by `owner`.
    ///
    /// The draft carries no assignee or attachments yet; those need access
    /// checks and I/O.
    pub(crate) fn into_input(self, owner: UserId) -> Result<CreateInput, TaskValidationError> {
        let Self {
            title,
            category,
            status,
            description,
            due_date,
            due_time,
            assigned_to,
            files,
        } = self;

        if status.trim().is_empty() {
            return Err(TaskValidationError::MissingField("status"));
        }
        let mut draft = TaskDraft::new(owner, TaskTitle::new(title)?, Category::new(category)?);
        draft.status = TaskStatus::try_from(status.as_str())?;
        draft.description = non_blank(description);
        draft.due_date = non_blank(due_date).as_deref().map(parse_due_date).transpose()?;
        draft.due_time = non_blank(due_time).as_deref().map(parse_due_time).transpose()?;

        Ok(CreateInput {
            draft,
            assigned_to,
            files,
        })
    }
}

/// Request payload for updating a task.
///
/// Absent or blank fields leave the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    category: Option<String>,
    status: Option<String>,
    description: Option<String>,
    due_date: Option<String>,
    due_time: Option<String>,
    assigned_to: Option<String>,
    files: Vec<UploadedFile>,
}

impl UpdateTaskRequest {
    /// Creates a request that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Sets the due time.
    #[must_use]
    pub fn with_due_time(mut self, due_time: impl Into<String>) -> Self {
        self.due_time = Some(due_time.into());
        self
    }

    /// Sets the assignment value.
    ///
    /// An empty value, `null`, or `undefined` clears the assignee.
    #[must_use]
    pub fn with_assigned_to(mut self, assigned_to: impl Into<String>) -> Self {
        self.assigned_to = Some(assigned_to.into());
        self
    }

    /// Adds uploaded files.
    #[must_use]
    pub fn with_files(mut self, files: impl IntoIterator<Item = UploadedFile>) -> Self {
        self.files.extend(files);
        self
    }

    /// Parses the field changes. Assignment and attachments are resolved by
    /// the service.
    pub(crate) fn into_input(self) -> Result<UpdateInput, TaskValidationError> {
        let Self {
            title,
            category,
            status,
            description,
            due_date,
            due_time,
            assigned_to,
            files,
        } = self;

        let changes = TaskChanges {
            title: non_blank(title).map(TaskTitle::new).transpose()?,
            category: non_blank(category).map(Category::new).transpose()?,
            status: non_blank(status)
                .as_deref()
                .map(TaskStatus::try_from)
                .transpose()?,
            description: non_blank(description),
            due_date: non_blank(due_date).as_deref().map(parse_due_date).transpose()?,
            due_time: non_blank(due_time).as_deref().map(parse_due_time).transpose()?,
            ..TaskChanges::default()
        };

        Ok(UpdateInput {
            changes,
            assigned_to,
            files,
        })
    }
}

/// Parsed create request.
#[derive(Debug)]
pub(crate) struct CreateInput {
    pub(crate) draft: TaskDraft,
    pub(crate) assigned_to: Option<String>,
    pub(crate) files: Vec<UploadedFile>,
}

/// Parsed update request.
#[derive(Debug)]
pub(crate) struct UpdateInput {
    pub(crate) changes: TaskChanges,
    pub(crate) assigned_to: Option<String>,
    pub(crate) files: Vec<UploadedFile>,
}

/// Returns whether an assignment value means "no assignee".
pub(crate) fn clears_assignment(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty()
        || CLEARING_SENTINELS
            .iter()
            .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

fn parse_due_date(raw: &str) -> Result<NaiveDate, TaskValidationError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|stamp| stamp.date_naive()))
        .map_err(|_| TaskValidationError::InvalidDueDate(raw.to_owned()))
}

fn parse_due_time(raw: &str) -> Result<NaiveTime, TaskValidationError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| TaskValidationError::InvalidDueTime(raw.to_owned()))
}
