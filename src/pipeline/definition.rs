//! Pipeline definition (`dvc.yaml`)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::{Error, Result};

/// Stage command: DVC accepts a single string or a list run in sequence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Command {
    /// `cmd: python train.py`
    Single(String),
    /// `cmd: [python prepare.py, python train.py]`
    Sequence(Vec<String>),
}

impl Command {
    /// Render as one command line; sequences are joined with ` && `.
    #[must_use]
    pub fn to_command_line(&self) -> String {
        match self {
            Self::Single(cmd) => cmd.clone(),
            Self::Sequence(cmds) => cmds.join(" && "),
        }
    }
}

/// Entry of a stage's `metrics` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MetricRef {
    /// `- metrics.json`
    Path(String),
    /// `- metrics.json: {cache: false}`
    Mapping(Mapping),
}

/// Entry of a stage's `params` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamRef {
    /// Key in the default `params.yaml`
    Key(String),
    /// `- custom_params.yaml: [lr, depth]`
    File(Mapping),
}

/// One stage of `dvc.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StageSpec {
    cmd: Command,
    #[serde(default)]
    deps: Vec<String>,
    #[serde(default)]
    params: Vec<ParamRef>,
    #[serde(default)]
    metrics: Vec<MetricRef>,
}

impl StageSpec {
    /// Get the command line.
    #[must_use]
    pub fn command(&self) -> String {
        self.cmd.to_command_line()
    }

    /// Get the declared dependencies.
    #[must_use]
    pub fn deps(&self) -> &[String] {
        &self.deps
    }

    /// Get the raw `metrics` entries.
    #[must_use]
    pub fn metrics(&self) -> &[MetricRef] {
        &self.metrics
    }

    /// Iterate metric file paths in listed order.
    pub fn metric_paths(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().flat_map(|metric| match metric {
            MetricRef::Path(path) => vec![path.as_str()],
            MetricRef::Mapping(map) => string_keys(map),
        })
    }

    /// Iterate parameter files referenced explicitly by this stage.
    pub fn param_files(&self) -> impl Iterator<Item = &str> {
        self.params.iter().flat_map(|param| match param {
            ParamRef::Key(_) => Vec::new(),
            ParamRef::File(map) => string_keys(map),
        })
    }
}

/// Parsed `dvc.yaml`: stages in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineDefinition {
    path: PathBuf,
    stages: Vec<(String, StageSpec)>,
}

impl PipelineDefinition {
    /// Load a pipeline definition from disk.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if the file is missing or declares no `stages` mapping
    /// - `Error::Format` if the YAML or any stage is malformed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::from_io(path, e))?;
        Self::from_yaml_str(path, &text)
    }

    /// Parse a pipeline definition; `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Same as [`PipelineDefinition::load`], minus the missing-file case.
    pub fn from_yaml_str(path: impl AsRef<Path>, text: &str) -> Result<Self> {
        let path = path.as_ref();
        let root: Value =
            serde_yaml::from_str(text).map_err(|e| Error::format(path, e.to_string()))?;

        let Some(Value::Mapping(raw_stages)) = root.get("stages") else {
            return Err(Error::NotFound {
                path: path.to_path_buf(),
            });
        };

        let mut stages = Vec::with_capacity(raw_stages.len());
        for (key, value) in raw_stages {
            let name = key
                .as_str()
                .ok_or_else(|| Error::format(path, format!("stage name must be a string: {key:?}")))?;
            let spec: StageSpec = serde_yaml::from_value(value.clone())
                .map_err(|e| Error::format(path, format!("stage '{name}': {e}")))?;
            if let Some(bad) = spec.metrics.iter().find_map(non_string_key) {
                return Err(Error::format(
                    path,
                    format!("stage '{name}': metric path must be a string: {bad:?}"),
                ));
            }
            stages.push((name.to_string(), spec));
        }

        Ok(Self {
            path: path.to_path_buf(),
            stages,
        })
    }

    /// Get the file this definition was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the stages in declaration order.
    #[must_use]
    pub fn stages(&self) -> &[(String, StageSpec)] {
        &self.stages
    }

    /// Get a stage by name.
    #[must_use]
    pub fn stage(&self, name: &str) -> Option<&StageSpec> {
        self.stages
            .iter()
            .find(|(stage, _)| stage == name)
            .map(|(_, spec)| spec)
    }

    /// Parameter files referenced by any stage, first mention first, without repeats.
    #[must_use]
    pub fn param_files(&self) -> Vec<String> {
        let mut files: Vec<String> = Vec::new();
        for (_, spec) in &self.stages {
            for file in spec.param_files() {
                if !files.iter().any(|f| f == file) {
                    files.push(file.to_string());
                }
            }
        }
        files
    }
}

fn string_keys(map: &Mapping) -> Vec<&str> {
    map.keys().filter_map(Value::as_str).collect()
}

fn non_string_key(metric: &MetricRef) -> Option<Value> {
    match metric {
        MetricRef::Path(_) => None,
        MetricRef::Mapping(map) => map.keys().find(|k| !k.is_string()).cloned(),
    }
}
