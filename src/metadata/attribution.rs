//! Parameter attribution - ties parameter values to the stage they feed

use tracing::debug;

use super::{MetadataDocument, ParamValue, ParameterEntry};
use crate::{Error, Result};

/// Attribute `parameters` to the stage named `stage`.
///
/// Each `(name, value)` pair becomes a `ParameterEntry` and `name` is
/// appended to the stage's `inputs`, in iteration order. Names are not
/// deduplicated across stages.
///
/// # Errors
///
/// Returns `Error::Schema` if the document has no stage named `stage`.
pub fn attribute_parameters(
    doc: &mut MetadataDocument,
    stage: &str,
    parameters: &[(String, ParamValue)],
) -> Result<usize> {
    let node = doc
        .node_mut(stage)
        .ok_or_else(|| Error::Schema(format!("parameters given for unknown stage '{stage}'")))?;
    for (name, _) in parameters {
        node.push_input(name.clone());
    }

    for (name, value) in parameters {
        debug!(stage, parameter = %name, %value, "attributed parameter");
        doc.add_parameter(ParameterEntry::new(name.clone(), value.clone()));
    }

    Ok(parameters.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::StageRecord;

    fn doc_with(stages: &[&str]) -> MetadataDocument {
        let mut doc = MetadataDocument::new();
        for (i, name) in stages.iter().enumerate() {
            doc.add_to_nodes(StageRecord::new(i + 1, *name, Vec::new(), "cmd"))
                .unwrap();
        }
        doc
    }

    #[test]
    fn test_attribution_appends_inputs_and_entries() {
        let mut doc = doc_with(&["prepare", "train"]);
        let params = vec![
            ("seed".to_string(), ParamValue::Int(42)),
            ("split".to_string(), ParamValue::Float(0.8)),
        ];

        let count = attribute_parameters(&mut doc, "train", &params).unwrap();

        assert_eq!(count, 2);
        assert!(doc.node("prepare").unwrap().inputs().is_empty());
        assert_eq!(
            doc.node("train").unwrap().inputs(),
            ["seed".to_string(), "split".to_string()]
        );
        assert_eq!(doc.parameters()[0], ParameterEntry::new("seed", 42_i64));
        assert_eq!(doc.parameters()[1], ParameterEntry::new("split", 0.8));
    }

    #[test]
    fn test_attribution_keeps_cross_stage_collisions() {
        let mut doc = doc_with(&["prepare", "train"]);
        let seed = vec![("seed".to_string(), ParamValue::Int(1))];
        attribute_parameters(&mut doc, "prepare", &seed).unwrap();
        attribute_parameters(&mut doc, "train", &seed).unwrap();

        assert_eq!(doc.parameters_named("seed").len(), 2);
        assert_eq!(doc.node("prepare").unwrap().inputs(), ["seed".to_string()]);
        assert_eq!(doc.node("train").unwrap().inputs(), ["seed".to_string()]);
    }

    #[test]
    fn test_attribution_unknown_stage() {
        let mut doc = doc_with(&["train"]);
        let err = attribute_parameters(&mut doc, "evaluate", &[]).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }
}
