//! Stream client abstraction
//!
//! Defines the append primitive the sink drives, supporting the Redis
//! implementation and mock testing.

use contracts::{SpanContext, StreamError};

/// Record field under which sink-originated messages are stored
pub const OUTPUT_SINK_STREAM_KEY: &str = "redis.stream.key";

/// Stream client trait
///
/// Lifecycle (connect/release) goes through `Initializable`/`Disposable`;
/// this trait only covers the write path.
#[trait_variant::make(StreamClient: Send)]
pub trait LocalStreamClient {
    /// Append one record to `stream`
    ///
    /// # Arguments
    /// * `span_context` - Tracing context of the message
    /// * `message_type` - Message type identifier
    /// * `stream` - Destination stream name
    /// * `key` - Record field holding the encoded message
    /// * `payload` - Message payload
    ///
    /// # Returns
    /// Backend-assigned record id
    async fn append(
        &self,
        span_context: &SpanContext,
        message_type: &str,
        stream: &str,
        key: &str,
        payload: &serde_json::Value,
    ) -> Result<String, StreamError>;
}
