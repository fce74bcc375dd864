//! Append failure classification

use contracts::StreamError;

/// Outcome class of a failed append
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureClass {
    /// Payload/structure could not be parsed; retrying cannot help
    ParseFailure(StreamError),
    /// Backend reported several failures at once; retrying cannot help
    AggregateFailure(StreamError),
    /// Anything else; left to the caller's retry policy
    Other(StreamError),
}

impl FailureClass {
    /// Whether the caller may retry the batch
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Other(_))
    }

    pub fn error(&self) -> &StreamError {
        match self {
            Self::ParseFailure(e) | Self::AggregateFailure(e) | Self::Other(e) => e,
        }
    }

    pub fn into_error(self) -> StreamError {
        match self {
            Self::ParseFailure(e) | Self::AggregateFailure(e) | Self::Other(e) => e,
        }
    }
}

/// Classify a stream client error
pub fn classify(error: StreamError) -> FailureClass {
    match error {
        StreamError::Parse { .. } => FailureClass::ParseFailure(error),
        StreamError::Aggregate { .. } => FailureClass::AggregateFailure(error),
        StreamError::Connection { .. }
        | StreamError::Timeout { .. }
        | StreamError::Command { .. } => FailureClass::Other(error),
    }
}
