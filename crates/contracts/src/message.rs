//! PublishedMessage - Sink input
//!
//! Messages produced upstream and handed to an output sink.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Message body: type identifier + payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Fully qualified message type (e.g. "orders.OrderPlaced")
    #[serde(rename = "type")]
    pub message_type: String,

    /// Structured payload, encoded by the stream client
    pub payload: serde_json::Value,
}

impl Message {
    pub fn new(message_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            message_type: message_type.into(),
            payload,
        }
    }
}

/// Correlation/tracing context carried with a message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanContext {
    #[serde(default)]
    pub trace_id: String,

    #[serde(default)]
    pub span_id: String,

    #[serde(default)]
    pub sampled: bool,
}

impl SpanContext {
    pub fn new(trace_id: impl Into<String>, span_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            span_id: span_id.into(),
            sampled: true,
        }
    }
}

/// A message ready to be published
///
/// Owned by the caller for one sink invocation; sinks never retain it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedMessage {
    /// Message body
    pub message: Message,

    /// Tracing context
    #[serde(default)]
    pub span_context: SpanContext,

    /// Free-form metadata (not used for routing)
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    /// Destination override; `None` means the sink's default stream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_name: Option<String>,
}

impl PublishedMessage {
    /// Create a message routed to the sink's default stream
    pub fn new(message_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            message: Message::new(message_type, payload),
            span_context: SpanContext::default(),
            metadata: HashMap::new(),
            stream_name: None,
        }
    }

    /// Route this message to an explicit stream
    pub fn with_stream(mut self, stream_name: impl Into<String>) -> Self {
        self.stream_name = Some(stream_name.into());
        self
    }

    pub fn with_span_context(mut self, span_context: SpanContext) -> Self {
        self.span_context = span_context;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Resolve the destination stream against a default
    pub fn resolve_stream<'a>(&'a self, default_stream: &'a str) -> &'a str {
        self.stream_name.as_deref().unwrap_or(default_stream)
    }
}
