//! Metadata Document - the aggregate describing one pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MetricEntry, ParameterEntry, StageRecord};
use crate::{Error, Result};

/// An `inputs` name with no matching parameter entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingInput {
    /// Stage whose `inputs` holds the name
    pub stage: String,
    /// The unmatched parameter name
    pub input: String,
}

/// Metadata Document aggregates stages, parameters and metrics.
///
/// Built once per invocation and threaded by `&mut` through the reader,
/// attribution and metric collection steps, then handed to the exporter.
///
/// ## Invariants
///
/// - Stage names are unique (`add_to_nodes` rejects duplicates)
/// - Metric names are unique; re-adding a name overwrites its value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetadataDocument {
    nodes: Vec<StageRecord>,
    parameters: Vec<ParameterEntry>,
    metrics: Vec<MetricEntry>,
    created_at: DateTime<Utc>,
}

impl Default for MetadataDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataDocument {
    /// Create an empty document stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for constructing a document with optional fields.
    #[must_use]
    pub fn builder() -> MetadataDocumentBuilder {
        MetadataDocumentBuilder::new()
    }

    /// Get the stages in declaration order.
    #[must_use]
    pub fn nodes(&self) -> &[StageRecord] {
        &self.nodes
    }

    /// Get all parameter entries in attribution order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterEntry] {
        &self.parameters
    }

    /// Get all metric entries in first-seen order.
    #[must_use]
    pub fn metrics(&self) -> &[MetricEntry] {
        &self.metrics
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Check if the document holds no stages, parameters or metrics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.parameters.is_empty() && self.metrics.is_empty()
    }

    /// Append a stage.
    ///
    /// # Errors
    ///
    /// Returns `Error::Schema` if a stage with the same name already exists.
    pub fn add_to_nodes(&mut self, stage: StageRecord) -> Result<()> {
        if self.node(stage.name()).is_some() {
            return Err(Error::Schema(format!(
                "duplicate stage name '{}'",
                stage.name()
            )));
        }
        self.nodes.push(stage);
        Ok(())
    }

    /// Look up a stage by name.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&StageRecord> {
        self.nodes.iter().find(|n| n.name() == name)
    }

    /// Look up a stage by name for mutation.
    pub fn node_mut(&mut self, name: &str) -> Option<&mut StageRecord> {
        self.nodes.iter_mut().find(|n| n.name() == name)
    }

    /// Append a parameter entry. No deduplication takes place.
    pub fn add_parameter(&mut self, parameter: ParameterEntry) {
        self.parameters.push(parameter);
    }

    /// Insert a metric, overwriting the value of an existing metric with the same name.
    pub fn add_metric(&mut self, metric: MetricEntry) {
        match self.metrics.iter_mut().find(|m| m.name() == metric.name()) {
            Some(existing) => existing.set_value(metric.value()),
            None => self.metrics.push(metric),
        }
    }

    /// Get a metric value by name.
    #[must_use]
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics
            .iter()
            .find(|m| m.name() == name)
            .map(MetricEntry::value)
    }

    /// Get all parameter entries with the given name.
    #[must_use]
    pub fn parameters_named(&self, name: &str) -> Vec<&ParameterEntry> {
        self.parameters.iter().filter(|p| p.name() == name).collect()
    }

    /// Find stage inputs that reference no parameter entry.
    #[must_use]
    pub fn dangling_inputs(&self) -> Vec<DanglingInput> {
        let mut dangling = Vec::new();
        for node in &self.nodes {
            for input in node.inputs() {
                if !self.parameters.iter().any(|p| p.name() == input) {
                    dangling.push(DanglingInput {
                        stage: node.name().to_string(),
                        input: input.clone(),
                    });
                }
            }
        }
        dangling
    }
}

/// Builder for `MetadataDocument`.
#[derive(Debug)]
pub struct MetadataDocumentBuilder {
    created_at: DateTime<Utc>,
}

impl Default for MetadataDocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataDocumentBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
        }
    }

    /// Set a custom creation timestamp (useful for deserialization/testing).
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Build the empty `MetadataDocument`.
    #[must_use]
    pub fn build(self) -> MetadataDocument {
        MetadataDocument {
            nodes: Vec::new(),
            parameters: Vec::new(),
            metrics: Vec::new(),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_default_is_empty() {
        let doc = MetadataDocument::new();
        assert!(doc.is_empty());
        assert!(doc.dangling_inputs().is_empty());
    }

    #[test]
    fn test_duplicate_stage_rejected() {
        let mut doc = MetadataDocument::new();
        doc.add_to_nodes(StageRecord::new(1, "train", Vec::new(), "a"))
            .unwrap();
        let err = doc
            .add_to_nodes(StageRecord::new(2, "train", Vec::new(), "b"))
            .unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
        assert_eq!(doc.nodes().len(), 1);
    }

    #[test]
    fn test_metric_last_write_wins_keeps_position() {
        let mut doc = MetadataDocument::new();
        doc.add_metric(MetricEntry::new("acc", 0.5));
        doc.add_metric(MetricEntry::new("f1_score", 0.4));
        doc.add_metric(MetricEntry::new("acc", 0.9));

        assert_eq!(doc.metrics().len(), 2);
        assert_eq!(doc.metrics()[0].name(), "acc");
        assert_eq!(doc.metric("acc"), Some(0.9));
    }

    #[test]
    fn test_dangling_input_detected() {
        let mut doc = MetadataDocument::new();
        let mut stage = StageRecord::new(1, "train", Vec::new(), "run");
        stage.push_input("seed");
        doc.add_to_nodes(stage).unwrap();

        let dangling = doc.dangling_inputs();
        assert_eq!(
            dangling,
            vec![DanglingInput {
                stage: "train".to_string(),
                input: "seed".to_string()
            }]
        );

        doc.add_parameter(ParameterEntry::new("seed", 42_i64));
        assert!(doc.dangling_inputs().is_empty());
    }
}
