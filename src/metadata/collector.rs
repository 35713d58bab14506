//! Metrics Collector - loads metric files referenced by stages

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{MetadataDocument, MetricEntry};
use crate::pipeline::StageSpec;
use crate::{Error, Result};

/// Loads flat `{name: number}` JSON metric files into a document.
///
/// Paths in `dvc.yaml` are relative to the repository root, so the
/// collector resolves them against `root`. Processing order decides
/// collisions: the last file to define a name wins.
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    root: PathBuf,
}

impl MetricsCollector {
    /// Create a collector resolving metric paths against `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the root directory metric paths are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Collect every metric file listed by `stage`, in listed order.
    ///
    /// Returns the number of metric values read.
    ///
    /// # Errors
    ///
    /// See [`MetricsCollector::collect_file`].
    pub fn collect_stage(&self, doc: &mut MetadataDocument, stage: &StageSpec) -> Result<usize> {
        let mut total = 0;
        for path in stage.metric_paths() {
            total += self.collect_file(doc, path)?;
        }
        Ok(total)
    }

    /// Load one metric file and insert each entry into `doc`.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if the file does not exist
    /// - `Error::Format` if it is not a JSON object whose values are all numbers
    pub fn collect_file(&self, doc: &mut MetadataDocument, path: &str) -> Result<usize> {
        let metrics = load_metrics(&self.root.join(path))?;
        let count = metrics.len();
        for metric in metrics {
            debug!(metric = metric.name(), value = metric.value(), "collected metric");
            doc.add_metric(metric);
        }
        info!(path, count, "loaded metric file");
        Ok(count)
    }
}

/// Parse a flat numeric JSON metric file.
///
/// # Errors
///
/// Returns `Error::NotFound` when the file is missing and `Error::Format`
/// when the content is not a flat `{string: number}` object.
pub fn load_metrics(path: &Path) -> Result<Vec<MetricEntry>> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::from_io(path, e))?;
    parse_metrics(path, &text)
}

fn parse_metrics(path: &Path, text: &str) -> Result<Vec<MetricEntry>> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| Error::format(path, e.to_string()))?;
    let serde_json::Value::Object(map) = value else {
        return Err(Error::format(path, "metric file must contain a JSON object"));
    };

    map.into_iter()
        .map(|(name, value)| {
            value
                .as_f64()
                .map(|v| MetricEntry::new(name.clone(), v))
                .ok_or_else(|| Error::format(path, format!("metric '{name}' is not a number: {value}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_metrics() {
        let metrics = parse_metrics(
            Path::new("metrics.json"),
            r#"{"acc": 0.95, "f1_score": 0.93}"#,
        )
        .unwrap();
        assert_eq!(
            metrics,
            vec![MetricEntry::new("acc", 0.95), MetricEntry::new("f1_score", 0.93)]
        );
    }

    #[test]
    fn test_integer_metric_accepted() {
        let metrics = parse_metrics(Path::new("m.json"), r#"{"epochs": 10}"#).unwrap();
        assert_eq!(metrics[0].value(), 10.0);
    }

    #[test]
    fn test_non_numeric_metric_rejected() {
        let err = parse_metrics(Path::new("m.json"), r#"{"acc": "high"}"#).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }

    #[test]
    fn test_nested_metric_rejected() {
        let err = parse_metrics(Path::new("m.json"), r#"{"train": {"acc": 0.9}}"#).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }

    #[test]
    fn test_array_document_rejected() {
        let err = parse_metrics(Path::new("m.json"), "[0.9]").unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let mut doc = MetadataDocument::new();
        let collector = MetricsCollector::new("/definitely/not/here");
        let err = collector.collect_file(&mut doc, "metrics.json").unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
