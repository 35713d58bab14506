//! # dvc-dataverse: DVC Pipeline Metadata for Dataverse
//!
//! **Version**: 0.1.0
//!
//! Reads the declarative side of a DVC repository (`dvc.yaml`,
//! `params.yaml`, metric files), assembles a typed metadata document and
//! publishes it, with a snapshot of the repository, to a Dataverse
//! collection.
//!
//! ## Flow
//!
//! ```text
//! PipelineDescriptionReader ──> attribute_parameters ──> MetricsCollector
//!            (stages)              (inputs, params)         (metrics)
//!                                        │
//!                                        ▼
//!                      MetadataDocument ──> DataverseDataset ──> upload
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use dvc_dataverse::export::{DataverseDataset, LinkingTemplate};
//!
//! let doc = dvc_dataverse::parse_dvc_repo(".")?;
//! let dataset = DataverseDataset::from_document(&doc, &LinkingTemplate::default());
//!
//! for node in doc.nodes() {
//!     println!("{}: {} (inputs {:?})", node.step(), node.name(), node.inputs());
//! }
//! # let _ = dataset;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod error;
pub mod export;
pub mod metadata;
pub mod pipeline;
mod repo;

pub use config::ExportConfig;
pub use error::{Error, Result};
pub use repo::parse_dvc_repo;
