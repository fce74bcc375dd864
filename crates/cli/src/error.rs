//! Error types for CLI operations.

use contracts::ContractError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Input file not found
    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    /// A JSON line could not be decoded into a published message
    #[error("Invalid message at line {line}: {message}")]
    InvalidInput { line: usize, message: String },

    /// The sink bailed the batch; no further attempt was made
    #[error("Batch abandoned on attempt {attempt}: {source}")]
    Bailed {
        attempt: u32,
        #[source]
        source: ContractError,
    },

    /// Every attempt failed with a retryable error
    #[error("Batch failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: ContractError,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn input_not_found(path: impl Into<String>) -> Self {
        Self::InputNotFound { path: path.into() }
    }

    pub fn invalid_input(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            line,
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
