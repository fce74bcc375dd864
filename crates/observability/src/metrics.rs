//! MetricsRecorder implementations
//!
//! - `PrometheusMetrics`: forwards to the `metrics` facade (Prometheus exporter)
//! - `InMemoryMetrics`: keeps counters in memory for summaries and tests
//! - `CompositeMetrics`: fans one increment out to several recorders

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use contracts::MetricsRecorder;
use metrics::{counter, Label};

/// Recorder backed by the global `metrics` recorder
///
/// Whatever exporter is installed (Prometheus via [`crate::init_with_config`]) receives
/// the counters; without one the increments are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusMetrics;

impl MetricsRecorder for PrometheusMetrics {
    fn increment(&self, name: &str, labels: &[(&'static str, &str)]) {
        let labels: Vec<Label> = labels
            .iter()
            .map(|(key, value)| Label::new(*key, value.to_string()))
            .collect();
        counter!(name.to_string(), labels).increment(1);
    }
}

/// Counter identity: name + sorted labels
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CounterKey {
    pub name: String,
    pub labels: Vec<(String, String)>,
}

impl CounterKey {
    fn new(name: &str, labels: &[(&str, &str)]) -> Self {
        let mut labels: Vec<(String, String)> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        labels.sort();
        Self {
            name: name.to_string(),
            labels,
        }
    }

    /// Value of label `key`, if present
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// In-memory counter store
#[derive(Debug, Default)]
pub struct InMemoryMetrics {
    counters: Mutex<BTreeMap<CounterKey, u64>>,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of one counter series
    pub fn count(&self, name: &str, labels: &[(&str, &str)]) -> u64 {
        self.lock()
            .get(&CounterKey::new(name, labels))
            .copied()
            .unwrap_or(0)
    }

    /// Sum over all series of `name`
    pub fn total(&self, name: &str) -> u64 {
        self.lock()
            .iter()
            .filter(|(key, _)| key.name == name)
            .map(|(_, value)| value)
            .sum()
    }

    /// All series of `name`, ordered by labels
    pub fn series(&self, name: &str) -> Vec<(CounterKey, u64)> {
        self.lock()
            .iter()
            .filter(|(key, _)| key.name == name)
            .map(|(key, value)| (key.clone(), *value))
            .collect()
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<CounterKey, u64>> {
        self.counters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MetricsRecorder for InMemoryMetrics {
    fn increment(&self, name: &str, labels: &[(&'static str, &str)]) {
        *self.lock().entry(CounterKey::new(name, labels)).or_insert(0) += 1;
    }
}

/// Fan-out recorder
#[derive(Default, Clone)]
pub struct CompositeMetrics {
    recorders: Vec<Arc<dyn MetricsRecorder>>,
}

impl CompositeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, recorder: Arc<dyn MetricsRecorder>) -> Self {
        self.recorders.push(recorder);
        self
    }

    pub fn len(&self) -> usize {
        self.recorders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recorders.is_empty()
    }
}

impl MetricsRecorder for CompositeMetrics {
    fn increment(&self, name: &str, labels: &[(&'static str, &str)]) {
        for recorder in &self.recorders {
            recorder.increment(name, labels);
        }
    }
}
