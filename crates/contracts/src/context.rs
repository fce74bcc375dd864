//! Component context handed to lifecycle hooks

use std::fmt;
use std::sync::Arc;

/// Metrics recording sink
///
/// Implementations must be cheap to call from the hot path.
pub trait MetricsRecorder: Send + Sync {
    /// Increment counter `name` by one with the given labels
    fn increment(&self, name: &str, labels: &[(&'static str, &str)]);
}

/// Recorder that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsRecorder for NoopMetrics {
    fn increment(&self, _name: &str, _labels: &[(&'static str, &str)]) {}
}

/// Context passed to `Initializable::initialize`
#[derive(Clone)]
pub struct ComponentContext {
    /// Metrics recorder shared by all components
    pub metrics: Arc<dyn MetricsRecorder>,
}

impl ComponentContext {
    pub fn new(metrics: Arc<dyn MetricsRecorder>) -> Self {
        Self { metrics }
    }
}

impl Default for ComponentContext {
    fn default() -> Self {
        Self::new(Arc::new(NoopMetrics))
    }
}

impl fmt::Debug for ComponentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentContext").finish_non_exhaustive()
    }
}
