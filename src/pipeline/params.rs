//! Parameter set (`params.yaml` and stage-referenced parameter files)

use std::path::Path;

use serde_yaml::Value;
use tracing::{debug, info};

use super::PipelineDefinition;
use crate::metadata::ParamValue;
use crate::{Error, Result};

/// Default parameter file DVC reads when a stage names no file.
pub const DEFAULT_PARAMS_FILE: &str = "params.yaml";

/// Parameters of one group (usually one stage), in file order.
pub type StageParams = Vec<(String, ParamValue)>;

/// Top-level parameter groups keyed by stage name.
///
/// Nested mappings below a group are flattened into dotted names
/// (`optimizer: {lr: 0.1}` becomes `optimizer.lr`). Top-level scalars
/// belong to no stage and are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    groups: Vec<(String, StageParams)>,
}

impl ParameterSet {
    /// Create an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the parameters a pipeline sees under `root`.
    ///
    /// Reads `params.yaml` when present, then every file the stages reference
    /// in declaration order. Groups with the same name are merged parameter
    /// by parameter; a later file overrides a value of the same name.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if a stage references a parameter file that does not exist
    /// - `Error::Format` if any parameter file is malformed
    pub fn load_for(root: impl AsRef<Path>, definition: &PipelineDefinition) -> Result<Self> {
        let root = root.as_ref();
        let mut set = Self::new();

        let default_path = root.join(DEFAULT_PARAMS_FILE);
        let default_loaded = default_path.is_file();
        if default_loaded {
            set.merge(Self::load(&default_path)?);
        } else {
            debug!(path = %default_path.display(), "no default parameter file");
        }

        for file in definition.param_files() {
            if default_loaded && file == DEFAULT_PARAMS_FILE {
                continue;
            }
            set.merge(Self::load(root.join(&file))?);
        }

        info!(groups = set.groups.len(), "loaded parameters");
        Ok(set)
    }

    /// Load a single parameter file.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if the file is missing, `Error::Format` if malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::from_io(path, e))?;
        Self::from_yaml_str(path, &text)
    }

    /// Parse a parameter document; `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// `Error::Format` if the document is not a mapping, or a value is a
    /// sequence, null or tagged.
    pub fn from_yaml_str(path: impl AsRef<Path>, text: &str) -> Result<Self> {
        let path = path.as_ref();
        let root: Value =
            serde_yaml::from_str(text).map_err(|e| Error::format(path, e.to_string()))?;
        let root = match root {
            Value::Null => return Ok(Self::new()),
            Value::Mapping(map) => map,
            other => {
                return Err(Error::format(
                    path,
                    format!("parameter file must be a mapping, found {other:?}"),
                ))
            }
        };

        let mut groups = Vec::new();
        for (key, value) in root {
            let group = key_string(path, &key)?;
            let Value::Mapping(_) = value else {
                debug!(key = %group, "skipping top-level scalar parameter");
                continue;
            };
            let mut params = Vec::new();
            flatten(path, None, &value, &mut params)?;
            groups.push((group, params));
        }

        Ok(Self { groups })
    }

    /// Insert or replace a group.
    pub fn insert(&mut self, group: impl Into<String>, params: StageParams) {
        let group = group.into();
        match self.groups.iter_mut().find(|(name, _)| *name == group) {
            Some(existing) => existing.1 = params,
            None => self.groups.push((group, params)),
        }
    }

    /// Merge `other` into `self` parameter by parameter.
    ///
    /// New groups and new names are appended; a name already present in a
    /// group takes the value from `other` and keeps its position.
    pub fn merge(&mut self, other: Self) {
        for (group, params) in other.groups {
            let Some((_, existing)) = self.groups.iter_mut().find(|(name, _)| *name == group) else {
                self.groups.push((group, params));
                continue;
            };
            for (name, value) in params {
                match existing.iter_mut().find(|(n, _)| *n == name) {
                    Some(slot) => {
                        debug!(group = %group, parameter = %name, "parameter overridden");
                        slot.1 = value;
                    }
                    None => existing.push((name, value)),
                }
            }
        }
    }

    /// Get the parameters of a stage, if the set has a group for it.
    #[must_use]
    pub fn stage(&self, name: &str) -> Option<&[(String, ParamValue)]> {
        self.groups
            .iter()
            .find(|(group, _)| group == name)
            .map(|(_, params)| params.as_slice())
    }

    /// Get all groups in insertion order.
    #[must_use]
    pub fn groups(&self) -> &[(String, StageParams)] {
        &self.groups
    }

    /// Check if the set has no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn key_string(path: &Path, key: &Value) -> Result<String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(Error::format(
            path,
            format!("parameter name must be a scalar: {other:?}"),
        )),
    }
}

fn flatten(path: &Path, prefix: Option<&str>, value: &Value, out: &mut StageParams) -> Result<()> {
    let Value::Mapping(map) = value else {
        return Ok(());
    };
    for (key, value) in map {
        let key = key_string(path, key)?;
        let name = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key,
        };
        match value {
            Value::Mapping(_) => flatten(path, Some(&name), value, out)?,
            other => {
                let scalar = scalar(other)
                    .ok_or_else(|| Error::format(path, format!("parameter '{name}' is not a scalar")))?;
                out.push((name, scalar));
            }
        }
    }
    Ok(())
}

fn scalar(value: &Value) -> Option<ParamValue> {
    match value {
        Value::Bool(b) => Some(ParamValue::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(ParamValue::Int)
            .or_else(|| n.as_f64().map(ParamValue::Float)),
        Value::String(s) => Some(ParamValue::Str(s.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_groups_in_file_order() {
        let set = ParameterSet::from_yaml_str(
            "params.yaml",
            "train:\n  seed: 42\n  split: 0.8\n  booster: gbtree\n  early_stop: true\n",
        )
        .unwrap();

        let train = set.stage("train").unwrap();
        assert_eq!(
            train,
            [
                ("seed".to_string(), ParamValue::Int(42)),
                ("split".to_string(), ParamValue::Float(0.8)),
                ("booster".to_string(), ParamValue::Str("gbtree".to_string())),
                ("early_stop".to_string(), ParamValue::Bool(true)),
            ]
        );
        assert!(set.stage("prepare").is_none());
    }

    #[test]
    fn test_nested_parameters_flattened() {
        let set =
            ParameterSet::from_yaml_str("params.yaml", "train:\n  optimizer:\n    lr: 0.1\n")
                .unwrap();
        assert_eq!(
            set.stage("train").unwrap()[0],
            ("optimizer.lr".to_string(), ParamValue::Float(0.1))
        );
    }

    #[test]
    fn test_top_level_scalars_skipped() {
        let set = ParameterSet::from_yaml_str("params.yaml", "seed: 1\ntrain:\n  lr: 0.1\n")
            .unwrap();
        assert_eq!(set.groups().len(), 1);
        assert!(set.stage("seed").is_none());
    }

    #[test]
    fn test_sequence_value_rejected() {
        let err = ParameterSet::from_yaml_str("params.yaml", "train:\n  layers: [1, 2]\n")
            .unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }

    #[test]
    fn test_empty_document_is_empty_set() {
        assert!(ParameterSet::from_yaml_str("params.yaml", "").unwrap().is_empty());
    }

    #[test]
    fn test_merge_combines_groups_per_parameter() {
        let mut set = ParameterSet::new();
        set.insert(
            "train",
            vec![
                ("seed".to_string(), ParamValue::Int(42)),
                ("lr".to_string(), ParamValue::Float(0.1)),
            ],
        );
        let mut other = ParameterSet::new();
        other.insert(
            "train",
            vec![
                ("lr".to_string(), ParamValue::Float(0.2)),
                ("depth".to_string(), ParamValue::Int(3)),
            ],
        );
        other.insert("evaluate", vec![("threshold".to_string(), ParamValue::Float(0.5))]);
        set.merge(other);

        assert_eq!(set.groups().len(), 2);
        assert_eq!(
            set.stage("train").unwrap(),
            [
                ("seed".to_string(), ParamValue::Int(42)),
                ("lr".to_string(), ParamValue::Float(0.2)),
                ("depth".to_string(), ParamValue::Int(3)),
            ]
        );
        assert!(set.stage("evaluate").is_some());
    }

    #[test]
    fn test_insert_replaces_group() {
        let mut set = ParameterSet::new();
        set.insert("train", vec![("lr".to_string(), ParamValue::Float(0.1))]);
        set.insert("train", vec![("seed".to_string(), ParamValue::Int(1))]);
        assert_eq!(set.stage("train").unwrap().len(), 1);
        assert_eq!(set.stage("train").unwrap()[0].0, "seed");
    }
}
