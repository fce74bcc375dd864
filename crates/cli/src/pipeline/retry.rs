//! Bounded retry controller honoring sink bail requests

use std::time::Duration;

use contracts::{ContractError, OutputSink, PublishedMessage, RetryContext};
use tracing::{info, warn};

use crate::error::{CliError, Result};

/// Attempt budget and spacing
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl RetryPolicy {
    /// At least one attempt is always made
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
        }
    }
}

/// `RetryContext` handed to the sink on each attempt
#[derive(Debug)]
pub struct Retrier {
    attempt: u32,
    max_attempts: u32,
    bailed: Option<ContractError>,
}

impl Retrier {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempt: 0,
            max_attempts: max_attempts.max(1),
            bailed: None,
        }
    }

    fn next_attempt(&mut self) {
        self.attempt += 1;
    }

    fn take_bailed(&mut self) -> Option<ContractError> {
        self.bailed.take()
    }
}

impl RetryContext for Retrier {
    fn bail(&mut self, error: ContractError) {
        self.bailed = Some(error);
    }

    fn current_attempt(&self) -> u32 {
        self.attempt
    }

    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

/// Deliver `batch` through `sink`, re-sending the whole batch on retryable failures
///
/// Returns the number of attempts used. Messages appended before a failure
/// are sent again on the next attempt.
pub async fn publish_with_retry<S>(
    sink: &S,
    batch: Vec<PublishedMessage>,
    policy: RetryPolicy,
) -> Result<u32>
where
    S: OutputSink,
{
    let mut retrier = Retrier::new(policy.max_attempts);

    loop {
        retrier.next_attempt();
        let attempt = retrier.current_attempt();
        let result = sink.sink(batch.clone(), &mut retrier).await;

        if let Some(source) = retrier.take_bailed() {
            warn!(attempt, error = %source, "Sink bailed, not retrying");
            return Err(CliError::Bailed { attempt, source });
        }

        match result {
            Ok(()) => {
                info!(attempt, messages = batch.len(), "Batch delivered");
                return Ok(attempt);
            }
            Err(source) if retrier.is_final_attempt() => {
                return Err(CliError::RetriesExhausted {
                    attempts: attempt,
                    source,
                });
            }
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts = retrier.max_attempts(),
                    error = %e,
                    retry_in_ms = policy.interval.as_millis() as u64,
                    "Attempt failed, retrying"
                );
                tokio::time::sleep(policy.interval).await;
            }
        }
    }
}
