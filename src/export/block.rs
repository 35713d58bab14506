//! Dataverse metadata block model (native API JSON shape)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How Dataverse interprets a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeClass {
    /// Free text
    Primitive,
    /// Nested fields
    Compound,
    /// Value from a fixed vocabulary
    ControlledVocabulary,
}

/// Field value, shaped by `multiple` and `typeClass`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Single primitive/vocabulary value
    Text(String),
    /// Multiple primitive/vocabulary values
    Texts(Vec<String>),
    /// Multiple compound values
    Compounds(Vec<BTreeMap<String, Field>>),
}

/// One field of a metadata block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    type_name: String,
    multiple: bool,
    type_class: TypeClass,
    value: FieldValue,
}

impl Field {
    /// Single free-text field.
    #[must_use]
    pub fn primitive(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            multiple: false,
            type_class: TypeClass::Primitive,
            value: FieldValue::Text(value.into()),
        }
    }

    /// Multi-valued free-text field.
    #[must_use]
    pub fn primitives(type_name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            type_name: type_name.into(),
            multiple: true,
            type_class: TypeClass::Primitive,
            value: FieldValue::Texts(values),
        }
    }

    /// Multi-valued controlled vocabulary field.
    #[must_use]
    pub fn vocabulary(type_name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            type_name: type_name.into(),
            multiple: true,
            type_class: TypeClass::ControlledVocabulary,
            value: FieldValue::Texts(values),
        }
    }

    /// Multi-valued compound field; each entry is keyed by child `typeName`.
    #[must_use]
    pub fn compound(type_name: impl Into<String>, entries: Vec<Vec<Self>>) -> Self {
        let entries = entries
            .into_iter()
            .map(|children| {
                children
                    .into_iter()
                    .map(|child| (child.type_name.clone(), child))
                    .collect::<BTreeMap<_, _>>()
            })
            .collect();
        Self {
            type_name: type_name.into(),
            multiple: true,
            type_class: TypeClass::Compound,
            value: FieldValue::Compounds(entries),
        }
    }

    /// Get the field's `typeName`.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Get whether the field holds several values.
    #[must_use]
    pub const fn multiple(&self) -> bool {
        self.multiple
    }

    /// Get the field's type class.
    #[must_use]
    pub const fn type_class(&self) -> TypeClass {
        self.type_class
    }

    /// Get the field value.
    #[must_use]
    pub const fn value(&self) -> &FieldValue {
        &self.value
    }
}

/// A named group of fields, e.g. `citation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataBlock {
    display_name: String,
    fields: Vec<Field>,
}

impl MetadataBlock {
    /// Create an empty block.
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field.
    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Get the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Get the fields in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Get a field by `typeName`.
    #[must_use]
    pub fn field(&self, type_name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.type_name == type_name)
    }
}
