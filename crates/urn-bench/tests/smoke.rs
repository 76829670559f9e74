use std::fs;
use std::path::Path;

use tempfile::tempdir;
use urn_bench::config::{ExperimentConfig, Variant};
use urn_bench::runner::ExperimentRunner;

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("experiment.yaml");
    fs::write(&path, body).expect("write config");
    path
}

#[test]
fn yaml_experiment_runs_end_to_end() {
    let dir = tempdir().expect("temp dir");
    let path = write_config(
        dir.path(),
        r#"
run_id: "smoke"
urn:
  counts: [5, 5, 5]
simulation:
  discard: 4
  compare: 2
  trials: 50000
  seed: 4242
"#,
    );

    let config = ExperimentConfig::from_path(&path).expect("config validates");
    assert_eq!(config.variants, vec![Variant::List, Variant::Count]);

    let report = ExperimentRunner::new(config)
        .expect("runner created")
        .run()
        .expect("experiment completes");

    assert_eq!(report.run_id, "smoke");
    assert_eq!(report.seed, 4242);
    assert_eq!(report.variants.len(), 2);
    assert!((report.exact.probability - 60.0 / 210.0).abs() < 1e-15);
    for variant in &report.variants {
        assert!(variant.matches <= 50_000);
        assert!(
            variant.deviation.abs() < 0.015,
            "{:?} deviates by {}",
            variant.variant,
            variant.deviation
        );
    }

    let json: serde_json::Value =
        serde_json::from_str(&report.to_json().expect("serialize")).expect("valid json");
    assert_eq!(json["counts"], serde_json::json!([5, 5, 5]));
    assert_eq!(json["trials"], 50_000);
}

#[test]
fn invalid_file_reports_its_path() {
    let dir = tempdir().expect("temp dir");
    let path = write_config(dir.path(), "urn:\n  counts: [1, 1]\n");

    let err = ExperimentConfig::from_path(&path).expect_err("2 balls cannot feed 6 draws");
    assert_eq!(err.path(), path.as_path());
    assert!(err.to_string().contains("simulation.discard"), "{err}");
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempdir().expect("temp dir");
    let err = ExperimentConfig::from_path(dir.path().join("absent.yaml")).expect_err("missing");
    assert!(err.to_string().starts_with("failed to read config"), "{err}");
}

#[test]
fn bundled_sample_config_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs/three_colors.yaml");
    let config = ExperimentConfig::from_path(path).expect("sample config validates");
    assert_eq!(config.urn.counts, vec![5, 5, 5]);
    assert_eq!(config.simulation.seed, Some(20251017));
}
