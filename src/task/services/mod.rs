//! Application services for task orchestration.

mod error;
mod lifecycle;
mod request;
mod view;

pub use error::{TaskServiceError, TaskServiceResult, TaskValidationError};
pub use lifecycle::TaskService;
pub use request::{CreateTaskRequest, UpdateTaskRequest};
pub use view::{ConsistencyReport, TaskDeletion, TaskView};
