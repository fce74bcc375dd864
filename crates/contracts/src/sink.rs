//! OutputSink trait - pipeline output interface
//!
//! Defines the abstract interface for sinks and their delivery guarantees.

use serde::{Deserialize, Serialize};

use crate::{ContractError, PublishedMessage, RetryContext};

/// Delivery consistency across the messages of one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyLevel {
    /// No cross-message guarantee; a failed batch may be partially written
    #[default]
    None,
    /// The whole batch is written or nothing is
    Atomic,
    /// Atomic within each partition/stream
    AtomicPerPartition,
}

/// Static description of a sink's delivery semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkGuarantees {
    pub consistency: ConsistencyLevel,
    /// Whether resubmitting a batch is free of duplicates
    pub idempotent: bool,
}

impl SinkGuarantees {
    /// No consistency, not idempotent
    pub const fn none() -> Self {
        Self {
            consistency: ConsistencyLevel::None,
            idempotent: false,
        }
    }
}

/// Output sink trait
///
/// All sink implementations must implement this trait.
#[trait_variant::make(OutputSink: Send)]
pub trait LocalOutputSink {
    /// Delivery guarantees; constant for the lifetime of the sink
    fn guarantees(&self) -> SinkGuarantees;

    /// Publish `messages` in order
    ///
    /// # Errors
    /// Returns errors the caller's retry controller should see. Errors the
    /// sink deems non-retryable are reported through `retry.bail` instead.
    async fn sink<I>(&self, messages: I, retry: &mut dyn RetryContext) -> Result<(), ContractError>
    where
        I: IntoIterator<Item = PublishedMessage> + Send,
        I::IntoIter: Send;
}
