//! Statistics result types and the grouping that produces them.

mod summary;

pub use summary::{CategoryStats, StatusCount, summarize_tasks};
