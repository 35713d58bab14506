//! Pipeline Metadata Tests
//!
//! Builds throwaway DVC repositories on disk and checks the document
//! `parse_dvc_repo` assembles from them.

use std::fs;
use std::path::Path;

use dvc_dataverse::metadata::{MetricEntry, ParamValue, ParameterEntry};
use dvc_dataverse::pipeline::PipelineDescriptionReader;
use dvc_dataverse::{parse_dvc_repo, Error};
use tempfile::TempDir;

fn repo(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for (path, content) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(full, content).expect("write fixture");
    }
    dir
}

const TWO_STAGES: &str = r"
stages:
  prepare:
    cmd: run prepare
    deps: []
  train:
    cmd: run train
    deps:
      - prepare
";

// =============================================================================
// Reader + attribution
// =============================================================================

#[test]
fn test_prepare_train_scenario() {
    let dir = repo(&[
        ("dvc.yaml", TWO_STAGES),
        ("params.yaml", "train:\n  seed: 42\n  split: 0.8\n"),
    ]);

    let doc = parse_dvc_repo(dir.path()).unwrap();

    assert_eq!(doc.nodes().len(), 2);
    let prepare = doc.node("prepare").unwrap();
    let train = doc.node("train").unwrap();
    assert_eq!(prepare.step(), 1);
    assert_eq!(train.step(), 2);
    assert!(prepare.inputs().is_empty());
    assert_eq!(train.inputs(), ["seed".to_string(), "split".to_string()]);
    assert_eq!(train.dependencies(), ["prepare".to_string()]);
    assert_eq!(train.command(), "run train");

    assert_eq!(
        doc.parameters(),
        [
            ParameterEntry::new("seed", 42_i64),
            ParameterEntry::new("split", 0.8)
        ]
    );
    assert!(doc.metrics().is_empty());
    assert!(doc.dangling_inputs().is_empty());
}

#[test]
fn test_missing_params_file_means_no_inputs() {
    let dir = repo(&[("dvc.yaml", TWO_STAGES)]);
    let doc = parse_dvc_repo(dir.path()).unwrap();
    assert!(doc.nodes().iter().all(|n| n.inputs().is_empty()));
    assert!(doc.parameters().is_empty());
}

#[test]
fn test_params_for_unknown_stage_ignored() {
    let dir = repo(&[
        ("dvc.yaml", TWO_STAGES),
        ("params.yaml", "evaluate:\n  threshold: 0.5\n"),
    ]);
    let doc = parse_dvc_repo(dir.path()).unwrap();
    assert!(doc.parameters().is_empty());
}

#[test]
fn test_stage_referenced_params_file() {
    let dir = repo(&[
        (
            "dvc.yaml",
            "stages:\n  train:\n    cmd: run train\n    params:\n      - conf/tuning.yaml:\n          - lr\n",
        ),
        ("conf/tuning.yaml", "train:\n  lr: 0.1\n  booster: gbtree\n"),
    ]);
    let doc = parse_dvc_repo(dir.path()).unwrap();
    assert_eq!(
        doc.node("train").unwrap().inputs(),
        ["lr".to_string(), "booster".to_string()]
    );
    assert_eq!(
        doc.parameters()[1].value(),
        &ParamValue::Str("gbtree".to_string())
    );
}

#[test]
fn test_missing_referenced_params_file() {
    let dir = repo(&[(
        "dvc.yaml",
        "stages:\n  train:\n    cmd: run train\n    params:\n      - tuning.yaml:\n",
    )]);
    assert!(matches!(
        parse_dvc_repo(dir.path()).unwrap_err(),
        Error::NotFound { .. }
    ));
}

#[test]
fn test_referenced_params_file_extends_default_group() {
    let dir = repo(&[
        (
            "dvc.yaml",
            "stages:\n  train:\n    cmd: run train\n    params:\n      - seed\n      - tuning.yaml:\n          - lr\n",
        ),
        ("params.yaml", "train:\n  seed: 42\n"),
        ("tuning.yaml", "train:\n  lr: 0.1\n"),
    ]);
    let doc = parse_dvc_repo(dir.path()).unwrap();
    assert_eq!(
        doc.node("train").unwrap().inputs(),
        ["seed".to_string(), "lr".to_string()]
    );
    assert_eq!(
        doc.parameters(),
        [
            ParameterEntry::new("seed", 42_i64),
            ParameterEntry::new("lr", 0.1)
        ]
    );
}

#[test]
fn test_referenced_params_file_overrides_same_name() {
    let dir = repo(&[
        (
            "dvc.yaml",
            "stages:\n  train:\n    cmd: run train\n    params:\n      - tuning.yaml:\n          - lr\n",
        ),
        ("params.yaml", "train:\n  lr: 0.5\n  seed: 1\n"),
        ("tuning.yaml", "train:\n  lr: 0.1\n"),
    ]);
    let doc = parse_dvc_repo(dir.path()).unwrap();
    assert_eq!(
        doc.node("train").unwrap().inputs(),
        ["lr".to_string(), "seed".to_string()]
    );
    assert_eq!(doc.parameters()[0], ParameterEntry::new("lr", 0.1));
}

#[test]
fn test_explicitly_referenced_default_params_file_missing() {
    let dir = repo(&[(
        "dvc.yaml",
        "stages:\n  train:\n    cmd: run train\n    params:\n      - params.yaml:\n          - seed\n",
    )]);
    match parse_dvc_repo(dir.path()).unwrap_err() {
        Error::NotFound { path } => assert!(path.ends_with(Path::new("params.yaml"))),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_cross_stage_parameter_names_not_deduplicated() {
    let dir = repo(&[
        ("dvc.yaml", TWO_STAGES),
        ("params.yaml", "prepare:\n  seed: 1\ntrain:\n  seed: 2\n"),
    ]);
    let doc = parse_dvc_repo(dir.path()).unwrap();

    let seeds = doc.parameters_named("seed");
    assert_eq!(seeds.len(), 2);
    assert_eq!(seeds[0].value(), &ParamValue::Int(1));
    assert_eq!(seeds[1].value(), &ParamValue::Int(2));
    assert_eq!(doc.node("prepare").unwrap().inputs(), ["seed".to_string()]);
    assert_eq!(doc.node("train").unwrap().inputs(), ["seed".to_string()]);
}

#[test]
fn test_missing_dvc_yaml() {
    let dir = repo(&[]);
    assert!(matches!(
        parse_dvc_repo(dir.path()).unwrap_err(),
        Error::NotFound { .. }
    ));
}

#[test]
fn test_definition_without_stages() {
    let dir = repo(&[("dvc.yaml", "plots: []\n")]);
    assert!(matches!(
        parse_dvc_repo(dir.path()).unwrap_err(),
        Error::NotFound { .. }
    ));
}

#[test]
fn test_reading_twice_is_identical() {
    let dir = repo(&[
        ("dvc.yaml", TWO_STAGES),
        ("params.yaml", "train:\n  seed: 42\n  split: 0.8\n"),
    ]);

    let first = parse_dvc_repo(dir.path()).unwrap();
    let second = parse_dvc_repo(dir.path()).unwrap();
    assert_eq!(first.nodes(), second.nodes());
    assert_eq!(first.parameters(), second.parameters());

    let reader = PipelineDescriptionReader::new(dir.path());
    assert_eq!(reader.stage_records().unwrap(), reader.stage_records().unwrap());
}

// =============================================================================
// Metrics
// =============================================================================

fn evaluate_repo(metric_files: &[(&str, &str)], metric_list: &str) -> TempDir {
    let dvc = format!(
        "stages:\n  evaluate:\n    cmd: run evaluate\n    deps: [model]\n    metrics:\n{metric_list}"
    );
    let mut files = vec![("dvc.yaml", dvc.as_str())];
    files.extend_from_slice(metric_files);
    repo(&files)
}

#[test]
fn test_metric_file_entries_unscoped() {
    let dir = evaluate_repo(
        &[("metrics.json", r#"{"acc": 0.95, "f1_score": 0.93}"#)],
        "      - metrics.json:\n          cache: false\n",
    );
    let doc = parse_dvc_repo(dir.path()).unwrap();
    assert_eq!(
        doc.metrics(),
        [
            MetricEntry::new("acc", 0.95),
            MetricEntry::new("f1_score", 0.93)
        ]
    );
}

#[test]
fn test_recurring_metric_last_file_wins() {
    let dir = evaluate_repo(
        &[
            ("first.json", r#"{"acc": 0.5, "loss": 0.7}"#),
            ("second.json", r#"{"acc": 0.9}"#),
        ],
        "      - first.json:\n          cache: false\n      - second.json:\n          cache: false\n",
    );
    let doc = parse_dvc_repo(dir.path()).unwrap();
    assert_eq!(doc.metrics().len(), 2);
    assert_eq!(doc.metric("acc"), Some(0.9));
    assert_eq!(doc.metric("loss"), Some(0.7));
}

#[test]
fn test_recurring_metric_across_stages_last_stage_wins() {
    let dir = repo(&[
        (
            "dvc.yaml",
            "stages:\n  a:\n    cmd: a\n    metrics:\n      - a.json\n  b:\n    cmd: b\n    metrics:\n      - b.json\n",
        ),
        ("a.json", r#"{"acc": 0.1}"#),
        ("b.json", r#"{"acc": 0.2}"#),
    ]);
    let doc = parse_dvc_repo(dir.path()).unwrap();
    assert_eq!(doc.metric("acc"), Some(0.2));
}

#[test]
fn test_missing_metric_file() {
    let dir = evaluate_repo(&[], "      - metrics.json:\n          cache: false\n");
    let err = parse_dvc_repo(dir.path()).unwrap_err();
    match err {
        Error::NotFound { path } => assert!(path.ends_with(Path::new("metrics.json"))),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_malformed_metric_file() {
    let dir = evaluate_repo(
        &[("metrics.json", r#"{"acc": "very good"}"#)],
        "      - metrics.json\n",
    );
    assert!(matches!(
        parse_dvc_repo(dir.path()).unwrap_err(),
        Error::Format { .. }
    ));
}
