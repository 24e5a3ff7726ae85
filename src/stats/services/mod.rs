//! Application services for statistics.

mod aggregator;
mod error;

pub use aggregator::StatsAggregator;
pub use error::{StatsError, StatsResult};
