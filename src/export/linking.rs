//! Linking template - maps document objects onto metadata block fields

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::block::{Field, MetadataBlock};
use super::schema::DataModelSchema;
use crate::metadata::{MetadataDocument, MetricEntry, ParameterEntry, StageRecord};
use crate::{Error, Result};

/// Target of one document object: a compound field and its child fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectLink {
    /// Compound field `typeName`
    pub field: String,
    /// Attribute name -> child field `typeName`
    pub attributes: BTreeMap<String, String>,
}

/// Linking template, usually read from `linking_template.yaml`.
///
/// ```yaml
/// block: dvc
/// display_name: DVC Pipeline
/// objects:
///   metrics:
///     field: dvcMetric
///     attributes:
///       name: dvcMetricName
///       value: dvcMetricValue
/// ```
///
/// Objects or attributes left out of the template are not exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkingTemplate {
    /// Metadata block key
    pub block: String,
    /// Metadata block display name
    pub display_name: String,
    /// Object name -> link
    pub objects: BTreeMap<String, ObjectLink>,
}

impl Default for LinkingTemplate {
    fn default() -> Self {
        let link = |field: &str, attrs: &[(&str, &str)]| ObjectLink {
            field: field.to_string(),
            attributes: attrs
                .iter()
                .map(|(a, f)| ((*a).to_string(), (*f).to_string()))
                .collect(),
        };

        let objects = BTreeMap::from([
            (
                "nodes".to_string(),
                link(
                    "dvcNode",
                    &[
                        ("step", "dvcNodeStep"),
                        ("name", "dvcNodeName"),
                        ("dependencies", "dvcNodeDependencies"),
                        ("inputs", "dvcNodeInputs"),
                        ("command", "dvcNodeCommand"),
                    ],
                ),
            ),
            (
                "parameters".to_string(),
                link(
                    "dvcParameter",
                    &[("name", "dvcParameterName"), ("value", "dvcParameterValue")],
                ),
            ),
            (
                "metrics".to_string(),
                link(
                    "dvcMetric",
                    &[("name", "dvcMetricName"), ("value", "dvcMetricValue")],
                ),
            ),
        ]);

        Self {
            block: "dvc".to_string(),
            display_name: "DVC Pipeline Metadata".to_string(),
            objects,
        }
    }
}

impl LinkingTemplate {
    /// Load a template from a YAML file.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if missing, `Error::Template` if malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::from_io(path, e))?;
        Self::from_yaml_str(&text)
    }

    /// Load a template, falling back to [`LinkingTemplate::default`] when the file is absent.
    ///
    /// # Errors
    ///
    /// `Error::Template` if the file exists but is malformed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(path.as_ref()) {
            Err(Error::NotFound { path }) => {
                info!(path = %path.display(), "no linking template, using built-in default");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Parse a template from YAML.
    ///
    /// # Errors
    ///
    /// `Error::Template` if the YAML does not describe a template.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| Error::Template(e.to_string()))
    }

    /// Check that every linked object and attribute exists in `schema`.
    ///
    /// # Errors
    ///
    /// `Error::Template` naming the first unknown object or attribute, or an empty field name.
    pub fn validate_against(&self, schema: &DataModelSchema) -> Result<()> {
        if self.block.trim().is_empty() {
            return Err(Error::Template("block name is empty".to_string()));
        }
        for (object, link) in &self.objects {
            if schema.object(object).is_none() {
                return Err(Error::Template(format!("unknown object '{object}'")));
            }
            if link.field.trim().is_empty() {
                return Err(Error::Template(format!("object '{object}' has no field name")));
            }
            for (attribute, field) in &link.attributes {
                if !schema.has_attribute(object, attribute) {
                    return Err(Error::Template(format!(
                        "unknown attribute '{object}.{attribute}'"
                    )));
                }
                if field.trim().is_empty() {
                    return Err(Error::Template(format!(
                        "attribute '{object}.{attribute}' has no field name"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Map a document into a metadata block.
    ///
    /// Fields appear in the order nodes, parameters, metrics; an object with
    /// no entries in the document produces no field.
    #[must_use]
    pub fn map_document(&self, doc: &MetadataDocument) -> MetadataBlock {
        let mut block = MetadataBlock::new(&self.display_name);

        if let Some(link) = self.objects.get("nodes") {
            push_compound(&mut block, link, doc.nodes(), node_field);
        }
        if let Some(link) = self.objects.get("parameters") {
            push_compound(&mut block, link, doc.parameters(), parameter_field);
        }
        if let Some(link) = self.objects.get("metrics") {
            push_compound(&mut block, link, doc.metrics(), metric_field);
        }

        block
    }
}

fn push_compound<T>(
    block: &mut MetadataBlock,
    link: &ObjectLink,
    items: &[T],
    to_field: fn(&T, &str, &str) -> Option<Field>,
) {
    if items.is_empty() {
        return;
    }
    let entries = items
        .iter()
        .map(|item| {
            link.attributes
                .iter()
                .filter_map(|(attribute, type_name)| to_field(item, attribute, type_name))
                .collect::<Vec<_>>()
        })
        .collect();
    block.push(Field::compound(&link.field, entries));
}

fn node_field(node: &StageRecord, attribute: &str, type_name: &str) -> Option<Field> {
    match attribute {
        "step" => Some(Field::primitive(type_name, node.step().to_string())),
        "name" => Some(Field::primitive(type_name, node.name())),
        "command" => Some(Field::primitive(type_name, node.command())),
        "dependencies" => list_field(type_name, node.dependencies()),
        "inputs" => list_field(type_name, node.inputs()),
        _ => None,
    }
}

// Dataverse rejects multi-valued fields with no values.
fn list_field(type_name: &str, values: &[String]) -> Option<Field> {
    (!values.is_empty()).then(|| Field::primitives(type_name, values.to_vec()))
}

fn parameter_field(param: &ParameterEntry, attribute: &str, type_name: &str) -> Option<Field> {
    match attribute {
        "name" => Some(Field::primitive(type_name, param.name())),
        "value" => Some(Field::primitive(type_name, param.value().to_string())),
        _ => None,
    }
}

fn metric_field(metric: &MetricEntry, attribute: &str, type_name: &str) -> Option<Field> {
    match attribute {
        "name" => Some(Field::primitive(type_name, metric.name())),
        "value" => Some(Field::primitive(type_name, metric.value().to_string())),
        _ => None,
    }
}
