//! Mock stream client
//!
//! In-memory client for tests; supports injecting failures by append index.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use contracts::{
    ComponentContext, ContractError, Disposable, Initializable, SpanContext, StreamError,
};
use tracing::instrument;

use crate::client::StreamClient;

/// One recorded append call
#[derive(Debug, Clone, PartialEq)]
pub struct AppendedRecord {
    pub span_context: SpanContext,
    pub message_type: String,
    pub stream: String,
    pub key: String,
    pub payload: serde_json::Value,
}

#[derive(Debug, Default)]
struct MockState {
    /// Successful appends, in call order
    records: Vec<AppendedRecord>,
    /// Append calls attempted (successful or not)
    attempts: usize,
    /// 1-based attempt number -> injected error
    failures: HashMap<usize, StreamError>,
    fail_initialize: Option<String>,
    fail_dispose: Option<String>,
    initialize_count: u32,
    dispose_count: u32,
}

/// Mock stream client
///
/// Clones share state, so a test can keep a handle while the sink owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct MockStreamClient {
    state: Arc<Mutex<MockState>>,
}

impl MockStreamClient {
    /// Create a client whose appends all succeed
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `attempt`-th append call (1-based) fail with `error`
    pub fn fail_on_append(self, attempt: usize, error: StreamError) -> Self {
        self.lock().failures.insert(attempt, error);
        self
    }

    /// Make `initialize` fail
    pub fn fail_initialize(self, message: impl Into<String>) -> Self {
        self.lock().fail_initialize = Some(message.into());
        self
    }

    /// Make `dispose` fail
    pub fn fail_dispose(self, message: impl Into<String>) -> Self {
        self.lock().fail_dispose = Some(message.into());
        self
    }

    /// Successful appends, in call order
    pub fn records(&self) -> Vec<AppendedRecord> {
        self.lock().records.clone()
    }

    /// Number of append calls made, including failed ones
    pub fn append_attempts(&self) -> usize {
        self.lock().attempts
    }

    pub fn initialize_count(&self) -> u32 {
        self.lock().initialize_count
    }

    pub fn dispose_count(&self) -> u32 {
        self.lock().dispose_count
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StreamClient for MockStreamClient {
    #[instrument(
        name = "mock_stream_append",
        skip(self, span_context, payload),
        fields(stream = %stream, message_type = %message_type)
    )]
    async fn append(
        &self,
        span_context: &SpanContext,
        message_type: &str,
        stream: &str,
        key: &str,
        payload: &serde_json::Value,
    ) -> Result<String, StreamError> {
        let mut state = self.lock();
        state.attempts += 1;
        let attempt = state.attempts;

        if let Some(error) = state.failures.remove(&attempt) {
            return Err(error);
        }

        state.records.push(AppendedRecord {
            span_context: span_context.clone(),
            message_type: message_type.to_string(),
            stream: stream.to_string(),
            key: key.to_string(),
            payload: payload.clone(),
        });

        Ok(format!("{attempt}-0"))
    }
}

impl Initializable for MockStreamClient {
    async fn initialize(&mut self, _context: &ComponentContext) -> Result<(), ContractError> {
        let mut state = self.lock();
        state.initialize_count += 1;
        match &state.fail_initialize {
            Some(message) => Err(ContractError::initialization("mock_stream_client", message)),
            None => Ok(()),
        }
    }
}

impl Disposable for MockStreamClient {
    async fn dispose(&mut self) -> Result<(), ContractError> {
        let mut state = self.lock();
        state.dispose_count += 1;
        match &state.fail_dispose {
            Some(message) => Err(ContractError::disposal("mock_stream_client", message)),
            None => Ok(()),
        }
    }
}
