//! Pipeline Metadata Schema
//!
//! In-memory model of one DVC pipeline: its stages, the parameters that
//! feed them and the metrics they produce.
//!
//! ## Schema Overview
//!
//! ```text
//! MetadataDocument (1) ──< StageRecord (N)   [declaration order]
//!                     │          │ inputs
//!                     │          ▼
//!                     ├──< ParameterEntry (N) [attribution order]
//!                     └──< MetricEntry (N)    [flat, unique names]
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use dvc_dataverse::metadata::{
//!     attribute_parameters, MetadataDocument, MetricEntry, ParamValue, StageRecord,
//! };
//!
//! let mut doc = MetadataDocument::new();
//! doc.add_to_nodes(StageRecord::new(1, "train", vec![], "python train.py"))?;
//!
//! let params = vec![("seed".to_string(), ParamValue::Int(42))];
//! attribute_parameters(&mut doc, "train", &params)?;
//!
//! doc.add_metric(MetricEntry::new("acc", 0.95));
//! assert_eq!(doc.node("train").unwrap().inputs(), ["seed".to_string()]);
//! # Ok::<(), dvc_dataverse::Error>(())
//! ```

mod attribution;
mod collector;
mod document;
mod metric_entry;
mod parameter_entry;
mod stage_record;

pub use attribution::attribute_parameters;
pub use collector::{load_metrics, MetricsCollector};
pub use document::{DanglingInput, MetadataDocument, MetadataDocumentBuilder};
pub use metric_entry::MetricEntry;
pub use parameter_entry::{ParamValue, ParameterEntry};
pub use stage_record::StageRecord;
