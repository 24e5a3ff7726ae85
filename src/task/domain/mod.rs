//! Domain model for shared tasks.
//!
//! A task belongs to the user who created it and may be handed to one
//! assignee. It carries lightweight references to the attachments stored for
//! it and a version counter that guards concurrent writers.

mod error;
mod ids;
mod status;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{Category, TaskId, TaskTitle, TaskVersion};
pub use status::TaskStatus;
pub use task::{AssignmentChange, PersistedTaskData, Task, TaskChanges, TaskDraft};
