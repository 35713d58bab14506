//! Repository parsing: definition + parameters + metrics -> `MetadataDocument`

use std::path::Path;

use tracing::info;

use crate::metadata::{attribute_parameters, MetadataDocument, MetricsCollector};
use crate::pipeline::{stage_records, PipelineDescriptionReader};
use crate::Result;

/// Parse the DVC repository at `root` into a metadata document.
///
/// For every stage in declaration order: add its record, attribute its
/// parameters, then load the metric files it lists.
///
/// # Errors
///
/// - `Error::NotFound` if `dvc.yaml`, a referenced parameter file or a metric file is missing
/// - `Error::Format` if any of those files is malformed
///
/// # Example
///
/// ```rust,no_run
/// let doc = dvc_dataverse::parse_dvc_repo(".")?;
/// for node in doc.nodes() {
///     println!("{} {} <- {:?}", node.step(), node.name(), node.inputs());
/// }
/// # Ok::<(), dvc_dataverse::Error>(())
/// ```
pub fn parse_dvc_repo(root: impl AsRef<Path>) -> Result<MetadataDocument> {
    let root = root.as_ref();
    let (definition, params) = PipelineDescriptionReader::new(root).read()?;
    let collector = MetricsCollector::new(root);

    let mut doc = MetadataDocument::new();
    for (record, (name, spec)) in stage_records(&definition)
        .into_iter()
        .zip(definition.stages())
    {
        doc.add_to_nodes(record)?;

        if let Some(stage_params) = params.stage(name) {
            attribute_parameters(&mut doc, name, stage_params)?;
        }

        collector.collect_stage(&mut doc, spec)?;
    }

    info!(
        stages = doc.nodes().len(),
        parameters = doc.parameters().len(),
        metrics = doc.metrics().len(),
        "parsed DVC repository"
    );
    Ok(doc)
}
