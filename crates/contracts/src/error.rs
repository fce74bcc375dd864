//! Layered error definitions
//!
//! Categorized by source: config / lifecycle / stream

use thiserror::Error;

/// Errors reported by a stream client append.
///
/// `Parse` and `Aggregate` describe data the backend can never accept as-is;
/// every other variant is opaque to the sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// Payload or reply could not be parsed/encoded
    #[error("stream parse error: {message}")]
    Parse { message: String },

    /// Several failures reported together by the backend
    #[error("stream aggregate error: {message}")]
    Aggregate {
        message: String,
        errors: Vec<StreamError>,
    },

    /// Connection lost, refused or not yet established
    #[error("stream connection error: {message}")]
    Connection { message: String },

    /// Command did not complete in time
    #[error("stream command timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Any other error returned by the backend
    #[error("stream command error: {message}")]
    Command { message: String },
}

impl StreamError {
    /// Create parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create aggregate error
    pub fn aggregate(message: impl Into<String>, errors: Vec<StreamError>) -> Self {
        Self::Aggregate {
            message: message.into(),
            errors,
        }
    }

    /// Create connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create command error
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
        }
    }
}

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Lifecycle Errors =====
    /// Component construction or initialization failed
    #[error("failed to initialize '{component}': {message}")]
    Initialization { component: String, message: String },

    /// Component release failed
    #[error("failed to dispose '{component}': {message}")]
    Disposal { component: String, message: String },

    /// Component used before `initialize`
    #[error("'{component}' is not initialized")]
    NotInitialized { component: String },

    /// `initialize` called twice
    #[error("'{component}' is already initialized")]
    AlreadyInitialized { component: String },

    // ===== Stream Errors =====
    /// Error returned by the stream client, unchanged
    #[error(transparent)]
    Stream(#[from] StreamError),

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create initialization error
    pub fn initialization(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Initialization {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create disposal error
    pub fn disposal(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Disposal {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create not-initialized error
    pub fn not_initialized(component: impl Into<String>) -> Self {
        Self::NotInitialized {
            component: component.into(),
        }
    }

    /// The wrapped stream error, if this error came from the stream client
    pub fn as_stream_error(&self) -> Option<&StreamError> {
        match self {
            Self::Stream(e) => Some(e),
            _ => None,
        }
    }
}
