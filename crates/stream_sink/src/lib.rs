//! # Stream Sink
//!
//! Redis stream output sink.
//!
//! Responsibilities:
//! - Consume batches of `PublishedMessage`
//! - Append each message to its resolved stream
//! - Record one outcome metric per message
//! - Bail the batch on non-retryable failures, propagate the rest

pub mod classify;
pub mod client;
pub mod encoder;
pub mod metrics;
pub mod mock_client;
pub mod redis_client;
pub mod sink;

pub use classify::{classify, FailureClass};
pub use client::{StreamClient, OUTPUT_SINK_STREAM_KEY};
pub use contracts::{OutputSink, PublishedMessage, StreamError, StreamSinkConfig};
pub use encoder::{decode_record, encode_record, RecordEncoding};
pub use metrics::{
    record_msg_published, MetricResult, LABEL_RESULT, LABEL_STREAM_NAME, MSG_PUBLISHED,
};
pub use mock_client::{AppendedRecord, MockStreamClient};
pub use redis_client::RedisStreamClient;
pub use sink::RedisStreamSink;
