//! RetryContext - handle from the caller's retry controller

use crate::ContractError;

/// Per-invocation retry handle
///
/// Sinks only call [`RetryContext::bail`]; the attempt counters are for the
/// controller side.
pub trait RetryContext: Send {
    /// Abandon the current batch: no further retry must be scheduled
    fn bail(&mut self, error: ContractError);

    /// 1-based attempt number of the current invocation
    fn current_attempt(&self) -> u32;

    /// Maximum number of attempts the controller will make
    fn max_attempts(&self) -> u32;

    fn is_final_attempt(&self) -> bool {
        self.current_attempt() >= self.max_attempts()
    }
}
