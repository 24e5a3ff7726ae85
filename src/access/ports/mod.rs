//! Port contracts for identity lookups.

pub mod user_directory;

pub use user_directory::{UserDirectory, UserDirectoryError, UserDirectoryResult};

#[cfg(test)]
pub use user_directory::MockUserDirectory;
