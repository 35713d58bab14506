//! DVC pipeline description
//!
//! Reads the declarative side of a DVC repository: `dvc.yaml` for stages
//! and `params.yaml` (plus any parameter files stages reference) for
//! parameters. Nothing here runs a stage.

mod definition;
mod params;
mod reader;

pub use definition::{Command, MetricRef, ParamRef, PipelineDefinition, StageSpec};
pub use params::{ParameterSet, StageParams, DEFAULT_PARAMS_FILE};
pub use reader::{stage_records, PipelineDescriptionReader, DVC_FILE};
