//! Publish run statistics.

use std::collections::BTreeMap;
use std::time::Duration;

use observability::InMemoryMetrics;
use serde::Serialize;
use stream_sink::{MetricResult, LABEL_RESULT, LABEL_STREAM_NAME, MSG_PUBLISHED};

/// Outcome counts for one stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamCounts {
    pub success: u64,
    pub error: u64,
}

/// Statistics from a publish run
#[derive(Debug, Clone, Default, Serialize)]
pub struct PublishStats {
    /// Messages read from the input file
    pub messages_read: usize,

    /// Attempts made by the retry controller (0 = never ran)
    pub attempts: u32,

    /// Total duration of the run
    #[serde(skip)]
    pub duration: Duration,

    /// Per-stream outcome counts, keyed by resolved stream name
    pub streams: BTreeMap<String, StreamCounts>,
}

impl PublishStats {
    /// Build from the published-message counters
    pub fn from_metrics(
        metrics: &InMemoryMetrics,
        messages_read: usize,
        attempts: u32,
        duration: Duration,
    ) -> Self {
        let mut streams: BTreeMap<String, StreamCounts> = BTreeMap::new();

        for (key, value) in metrics.series(MSG_PUBLISHED) {
            let Some(stream) = key.label(LABEL_STREAM_NAME) else {
                continue;
            };
            let counts = streams.entry(stream.to_string()).or_default();
            match key.label(LABEL_RESULT) {
                Some(r) if r == MetricResult::Success.as_str() => counts.success += value,
                Some(r) if r == MetricResult::Error.as_str() => counts.error += value,
                _ => {}
            }
        }

        Self {
            messages_read,
            attempts,
            duration,
            streams,
        }
    }

    pub fn total_success(&self) -> u64 {
        self.streams.values().map(|c| c.success).sum()
    }

    pub fn total_error(&self) -> u64 {
        self.streams.values().map(|c| c.error).sum()
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Publish Statistics ===\n");
        println!("  Duration: {:.2}s", self.duration.as_secs_f64());
        println!("  Messages read: {}", self.messages_read);
        println!("  Attempts: {}", self.attempts);
        println!("  Published: {}", self.total_success());
        println!("  Errors: {}", self.total_error());

        if !self.streams.is_empty() {
            println!("\n  Streams:");
            for (stream, counts) in &self.streams {
                println!(
                    "    - {}: {} ok, {} error",
                    stream, counts.success, counts.error
                );
            }
        }

        println!();
    }
}
