//! Pipeline Metadata Example
//!
//! Builds the metadata document for a small three-stage pipeline from
//! in-memory YAML and prints the Dataverse payload it maps to.
//!
//! Run with: cargo run --example pipeline_metadata

use dvc_dataverse::export::{Citation, DataverseDataset, LinkingTemplate, Subject};
use dvc_dataverse::metadata::{attribute_parameters, MetadataDocument, MetricEntry};
use dvc_dataverse::pipeline::{stage_records, ParameterSet, PipelineDefinition};

const DVC_YAML: &str = r"
stages:
  DatasetPreparation:
    cmd: python -c 'from src.DatasetPreparation import DatasetPreparation; DatasetPreparation.load().run()'
    deps: []
  GradientBoosting:
    cmd: python -c 'from src.GradientBoosting import GradientBoosting; GradientBoosting.load().run()'
    deps: [nodes/DatasetPreparation/outs.json]
  ModelEvaluation:
    cmd: python -c 'from src.ModelEvaluation import ModelEvaluation; ModelEvaluation.load().run()'
    deps: [nodes/DatasetPreparation/outs.json, nodes/GradientBoosting/outs.json]
    metrics:
      - nodes/ModelEvaluation/metrics_no_cache.json:
          cache: false
";

const PARAMS_YAML: &str = r"
DatasetPreparation:
  seed: 42
  split: 0.8
GradientBoosting:
  learning_rate: 0.1
  max_depth: 3
  n_estimators: 100
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== dvc-dataverse Pipeline Metadata ===\n");

    // -------------------------------------------------------------------------
    // 1. Read the pipeline description
    // -------------------------------------------------------------------------
    let definition = PipelineDefinition::from_yaml_str("dvc.yaml", DVC_YAML)?;
    let params = ParameterSet::from_yaml_str("params.yaml", PARAMS_YAML)?;

    let mut doc = MetadataDocument::new();
    for record in stage_records(&definition) {
        let name = record.name().to_string();
        doc.add_to_nodes(record)?;
        if let Some(group) = params.stage(&name) {
            attribute_parameters(&mut doc, &name, group)?;
        }
    }

    // -------------------------------------------------------------------------
    // 2. Metrics as ModelEvaluation would have written them
    // -------------------------------------------------------------------------
    doc.add_metric(MetricEntry::new("acc", 0.956));
    doc.add_metric(MetricEntry::new("f1_score", 0.965));

    for node in doc.nodes() {
        println!("{}. {:<20} inputs: {:?}", node.step(), node.name(), node.inputs());
    }
    println!();

    // -------------------------------------------------------------------------
    // 3. Map to a Dataverse dataset
    // -------------------------------------------------------------------------
    let mut dataset = DataverseDataset::from_document(&doc, &LinkingTemplate::default());
    dataset.add_citation(
        &Citation::new("ML-Session Gradient Boosting Example")
            .description("This is an example")
            .subject(Subject::ComputerAndInformationScience)
            .author("Doe, Jane")
            .contact("Doe, Jane", "jane.doe@example.org"),
    )?;

    println!("{}", serde_json::to_string_pretty(&dataset.payload()?)?);
    Ok(())
}
