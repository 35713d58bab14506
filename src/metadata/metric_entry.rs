//! Metric Entry - scalar measurements produced by stages

use serde::{Deserialize, Serialize};

/// Metric Entry represents one named measurement.
///
/// Metrics are not scoped by stage: the document holds a flat
/// name -> value mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    name: String,
    value: f64,
}

impl MetricEntry {
    /// Create a new metric entry.
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Get the metric name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the metric value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    pub(crate) fn set_value(&mut self, value: f64) {
        self.value = value;
    }
}
