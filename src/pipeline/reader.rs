//! Pipeline description reader

use std::path::{Path, PathBuf};

use tracing::info;

use super::{ParameterSet, PipelineDefinition};
use crate::metadata::StageRecord;
use crate::Result;

/// Pipeline definition file DVC reads from the repository root.
pub const DVC_FILE: &str = "dvc.yaml";

/// Reads `dvc.yaml` and the parameters it sees from a repository root.
#[derive(Debug, Clone)]
pub struct PipelineDescriptionReader {
    root: PathBuf,
}

impl PipelineDescriptionReader {
    /// Create a reader for the repository at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load the pipeline definition.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if `dvc.yaml` is missing or has no stages,
    /// `Error::Format` if it is malformed.
    pub fn definition(&self) -> Result<PipelineDefinition> {
        PipelineDefinition::load(self.root.join(DVC_FILE))
    }

    /// Load the definition and its parameter set.
    ///
    /// # Errors
    ///
    /// See [`PipelineDescriptionReader::definition`] and [`ParameterSet::load_for`].
    pub fn read(&self) -> Result<(PipelineDefinition, ParameterSet)> {
        let definition = self.definition()?;
        let params = ParameterSet::load_for(&self.root, &definition)?;
        info!(
            stages = definition.stages().len(),
            param_groups = params.groups().len(),
            "read pipeline description"
        );
        Ok((definition, params))
    }

    /// Load the definition and produce its stage records.
    ///
    /// # Errors
    ///
    /// See [`PipelineDescriptionReader::definition`].
    pub fn stage_records(&self) -> Result<Vec<StageRecord>> {
        Ok(stage_records(&self.definition()?))
    }
}

/// Produce one `StageRecord` per stage, numbered `1..=N` in declaration
/// order, with empty `inputs`.
#[must_use]
pub fn stage_records(definition: &PipelineDefinition) -> Vec<StageRecord> {
    definition
        .stages()
        .iter()
        .enumerate()
        .map(|(i, (name, spec))| {
            StageRecord::new(i + 1, name.clone(), spec.deps().to_vec(), spec.command())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_one_based() {
        let def = PipelineDefinition::from_yaml_str(
            DVC_FILE,
            "stages:\n  prepare:\n    cmd: run prepare\n  train:\n    cmd: run train\n    deps: [prepare]\n",
        )
        .unwrap();

        let records = stage_records(&def);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].step(), 1);
        assert_eq!(records[0].name(), "prepare");
        assert_eq!(records[1].step(), 2);
        assert_eq!(records[1].dependencies(), ["prepare".to_string()]);
        assert!(records.iter().all(|r| r.inputs().is_empty()));
    }

    #[test]
    fn test_missing_dvc_yaml() {
        let reader = PipelineDescriptionReader::new("/definitely/not/here");
        assert!(matches!(
            reader.stage_records().unwrap_err(),
            crate::Error::NotFound { .. }
        ));
    }
}
