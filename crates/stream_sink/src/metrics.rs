//! Sink metrics for observability

use contracts::MetricsRecorder;

/// Counter incremented once per processed message
pub const MSG_PUBLISHED: &str = "redis_stream_sink_msg_published";

/// Label: resolved stream name
pub const LABEL_STREAM_NAME: &str = "stream_name";

/// Label: append outcome
pub const LABEL_RESULT: &str = "result";

/// Outcome label value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricResult {
    Success,
    Error,
}

impl MetricResult {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Record one published-message outcome
pub fn record_msg_published(recorder: &dyn MetricsRecorder, stream: &str, result: MetricResult) {
    recorder.increment(
        MSG_PUBLISHED,
        &[(LABEL_STREAM_NAME, stream), (LABEL_RESULT, result.as_str())],
    );
}
