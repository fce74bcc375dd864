//! Publish pipeline: retry controller and run statistics.

mod retry;
mod stats;

pub use retry::{publish_with_retry, RetryPolicy};
pub use stats::PublishStats;
