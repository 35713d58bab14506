//! Data model schema - explicit local shape of the metadata document
//!
//! The remote data model is treated as a versioned contract: it is fetched,
//! compared against the local schema, and never used to discover structure
//! at run time.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::metadata::{DanglingInput, MetadataDocument};
use crate::{Error, Result};

/// Version of the local data model.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// One object of the data model and its attribute names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSchema {
    /// Object name, e.g. `nodes`
    pub name: String,
    /// Attribute names, e.g. `step`, `name`
    pub attributes: Vec<String>,
}

impl ObjectSchema {
    fn new(name: &str, attributes: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            attributes: attributes.iter().map(|a| (*a).to_string()).collect(),
        }
    }
}

/// Schema of the pipeline metadata data model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataModelSchema {
    /// Data model name
    pub name: String,
    /// Semantic version, `major.minor.patch`
    pub version: String,
    /// Objects in the model
    pub objects: Vec<ObjectSchema>,
}

impl DataModelSchema {
    /// The schema `MetadataDocument` implements.
    #[must_use]
    pub fn local() -> Self {
        Self {
            name: "DVCMetadata".to_string(),
            version: SCHEMA_VERSION.to_string(),
            objects: vec![
                ObjectSchema::new(
                    "nodes",
                    &["step", "name", "dependencies", "inputs", "command"],
                ),
                ObjectSchema::new("parameters", &["name", "value"]),
                ObjectSchema::new("metrics", &["name", "value"]),
            ],
        }
    }

    /// Parse a contract document (YAML or JSON).
    ///
    /// # Errors
    ///
    /// `Error::Schema` if the document does not describe a data model.
    pub fn from_contract_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| Error::Schema(format!("invalid contract: {e}")))
    }

    /// Fetch a contract document from `url`.
    ///
    /// # Errors
    ///
    /// Transport/HTTP errors from the fetch, `Error::Schema` if unparsable.
    pub fn fetch(url: &str) -> Result<Self> {
        let text = super::client::fetch_text(url)?;
        let schema = Self::from_contract_str(&text)?;
        info!(url, name = %schema.name, version = %schema.version, "fetched data model contract");
        Ok(schema)
    }

    /// Get an object by name.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<&ObjectSchema> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Check whether `object` has `attribute`.
    #[must_use]
    pub fn has_attribute(&self, object: &str, attribute: &str) -> bool {
        self.object(object)
            .is_some_and(|o| o.attributes.iter().any(|a| a == attribute))
    }

    /// Get the major version component.
    ///
    /// # Errors
    ///
    /// `Error::Schema` if the version does not start with a number.
    pub fn major_version(&self) -> Result<u64> {
        self.version
            .split('.')
            .next()
            .and_then(|major| major.trim_start_matches('v').parse().ok())
            .ok_or_else(|| Error::Schema(format!("invalid schema version '{}'", self.version)))
    }

    /// Verify that this schema covers everything `remote` requires.
    ///
    /// # Errors
    ///
    /// `Error::Schema` on a major version mismatch, or when `remote` names an
    /// object or attribute this schema lacks.
    pub fn check_contract(&self, remote: &Self) -> Result<()> {
        let (local_major, remote_major) = (self.major_version()?, remote.major_version()?);
        if local_major != remote_major {
            return Err(Error::Schema(format!(
                "contract version {} is incompatible with local version {}",
                remote.version, self.version
            )));
        }

        for object in &remote.objects {
            if self.object(&object.name).is_none() {
                return Err(Error::Schema(format!(
                    "contract requires unknown object '{}'",
                    object.name
                )));
            }
            if let Some(missing) = object
                .attributes
                .iter()
                .find(|a| !self.has_attribute(&object.name, a))
            {
                return Err(Error::Schema(format!(
                    "contract requires unknown attribute '{}.{missing}'",
                    object.name
                )));
            }
        }
        Ok(())
    }

    /// Validate a document against the schema.
    ///
    /// Duplicate stage names fail. Inputs without a matching parameter are
    /// logged and returned, not rejected.
    ///
    /// # Errors
    ///
    /// `Error::Schema` if two stages share a name.
    pub fn validate(&self, doc: &MetadataDocument) -> Result<Vec<DanglingInput>> {
        for (i, node) in doc.nodes().iter().enumerate() {
            if doc.nodes()[..i].iter().any(|n| n.name() == node.name()) {
                return Err(Error::Schema(format!(
                    "duplicate stage name '{}'",
                    node.name()
                )));
            }
        }

        let dangling = doc.dangling_inputs();
        for d in &dangling {
            warn!(stage = %d.stage, input = %d.input, "stage input has no parameter entry");
        }
        Ok(dangling)
    }
}
