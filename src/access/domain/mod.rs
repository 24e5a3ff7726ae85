//! Domain model for actors and users.

mod actor;
mod error;
mod ids;
mod user;

pub use actor::{Actor, IdentityContext, Role};
pub use error::{AccessError, ParseRoleError};
pub use ids::{ParseUserIdError, UserId};
pub use user::UserSummary;
