//! Integration tests for the repro-sigma binary over an on-disk dataset

mod utils;

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_full_run_reports_adequate_and_writes_outputs() {
    let tmp = TempDir::new().unwrap();
    utils::write_population(tmp.path());

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("repro-sigma");
    cmd.arg(tmp.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("POPULATION ANALYSIS (N=3)"))
        .stdout(predicate::str::contains("[Batch 002] Sigma_k ="))
        .stdout(predicate::str::contains("t-test rule"))
        .stdout(predicate::str::contains("ADEQUATE"));

    let dsi = tmp.path().join("batch_001").join("dsi");
    assert!(dsi.join("dsi_01").join("min_composite_dsi_01.csv").is_file());
    assert!(dsi.join("dsi_02").join("min_composite_dsi_02.csv").is_file());

    let mean = fs::read_to_string(dsi.join("dsi_mean_001.csv")).unwrap();
    assert_eq!(mean.lines().count(), 3);
    assert!(mean.lines().all(|line| line.split(',').count() == 4));
    assert!(!mean.contains("-999.99"));

    let population = fs::read_to_string(tmp.path().join("resultats_population.csv")).unwrap();
    let rows: Vec<&str> = population.lines().collect();
    assert_eq!(rows[0], "Batch,Sigma_k");
    assert_eq!(rows.len(), 4);
    assert!(rows[3].starts_with("batch_003,0.0098"));
}

#[test]
fn test_second_run_ignores_written_composites() {
    let tmp = TempDir::new().unwrap();
    utils::write_population(tmp.path());

    assert_cmd::cargo::cargo_bin_cmd!("repro-sigma")
        .arg(tmp.path())
        .assert()
        .success();
    let first = fs::read_to_string(tmp.path().join("resultats_population.csv")).unwrap();
    assert_cmd::cargo::cargo_bin_cmd!("repro-sigma")
        .arg(tmp.path())
        .assert()
        .success();
    let second = fs::read_to_string(tmp.path().join("resultats_population.csv")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_json_output_parses() {
    let tmp = TempDir::new().unwrap();
    utils::write_population(tmp.path());

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("repro-sigma");
    cmd.arg(tmp.path()).arg("--format").arg("json").arg("--no-write");

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["subjects"].as_array().unwrap().len(), 3);
    assert_eq!(parsed["population"]["n"], 3);
    assert_eq!(parsed["verdict"]["t_test"], "adequate");
    assert_eq!(parsed["verdict"]["confidence_rule"], "adequate");

    assert!(!tmp.path().join("resultats_population.csv").exists());
}

#[test]
fn test_strict_threshold_is_inadequate() {
    let tmp = TempDir::new().unwrap();
    utils::write_population(tmp.path());

    assert_cmd::cargo::cargo_bin_cmd!("repro-sigma")
        .arg(tmp.path())
        .args(["--threshold", "5", "--no-write"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INADEQUATE"));
}

#[test]
fn test_single_subject_cannot_validate() {
    let tmp = TempDir::new().unwrap();
    utils::write_subject(tmp.path(), "batch_001", (2, 2), &[1.0, 1.01]);
    utils::write_subject(tmp.path(), "batch_002", (2, 2), &[1.0]);

    assert_cmd::cargo::cargo_bin_cmd!("repro-sigma")
        .arg(tmp.path())
        .arg("--no-write")
        .assert()
        .failure()
        .stdout(predicate::str::contains("[Batch 002] Invalid or insufficient data"))
        .stderr(predicate::str::contains("Validation impossible"));
}

#[test]
fn test_batch_filter_runs_one_subject() {
    let tmp = TempDir::new().unwrap();
    utils::write_population(tmp.path());

    assert_cmd::cargo::cargo_bin_cmd!("repro-sigma")
        .arg(tmp.path())
        .args(["--batch", "002", "--no-write"])
        .assert()
        .success()
        .stdout(predicate::str::contains("POPULATION ANALYSIS (N=1)"))
        .stdout(predicate::str::contains("[Batch 002]"));
}

#[test]
fn test_batch_run_keeps_population_table() {
    let tmp = TempDir::new().unwrap();
    utils::write_population(tmp.path());
    let table = tmp.path().join("resultats_population.csv");

    assert_cmd::cargo::cargo_bin_cmd!("repro-sigma")
        .arg(tmp.path())
        .assert()
        .success();
    let before = fs::read_to_string(&table).unwrap();
    assert_eq!(before.lines().count(), 4);

    assert_cmd::cargo::cargo_bin_cmd!("repro-sigma")
        .arg(tmp.path())
        .args(["--batch", "002"])
        .assert()
        .success()
        .stdout(predicate::str::contains("POPULATION ANALYSIS (N=1)"));

    let after = fs::read_to_string(&table).unwrap();
    assert_eq!(before, after);
    assert!(tmp
        .path()
        .join("batch_002/dsi/dsi_mean_002.csv")
        .is_file());
}

#[test]
fn test_unknown_batch_fails() {
    let tmp = TempDir::new().unwrap();
    utils::write_population(tmp.path());

    assert_cmd::cargo::cargo_bin_cmd!("repro-sigma")
        .arg(tmp.path())
        .args(["--batch", "batch_042"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No subject matching 'batch_042'"));
}

#[test]
fn test_point_inspection() {
    let tmp = TempDir::new().unwrap();
    utils::write_population(tmp.path());

    assert_cmd::cargo::cargo_bin_cmd!("repro-sigma")
        .arg(tmp.path())
        .args(["--batch", "batch_001", "--point", "2,3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("POINT (2, 3) for batch_001"))
        .stdout(predicate::str::contains("Repetition 2 (dsi_02) : Z = 1.0100"))
        .stdout(predicate::str::contains("Valid measurements (M)     : 2 / 2"));
}

#[test]
fn test_point_out_of_bounds_fails() {
    let tmp = TempDir::new().unwrap();
    utils::write_population(tmp.path());

    assert_cmd::cargo::cargo_bin_cmd!("repro-sigma")
        .arg(tmp.path())
        .args(["--batch", "001", "--point", "30,0"])
        .assert()
        .failure();
}

#[test]
fn test_config_file_overrides_threshold() {
    let tmp = TempDir::new().unwrap();
    utils::write_population(tmp.path());
    let config = tmp.path().join("repro.toml");
    fs::write(&config, "threshold = 2.0\nwrite_outputs = false\n").unwrap();

    assert_cmd::cargo::cargo_bin_cmd!("repro-sigma")
        .arg(tmp.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("H0: Sigma >= 2 µm"));

    assert!(!tmp.path().join("resultats_population.csv").exists());
}

#[test]
fn test_invalid_config_rejected() {
    let tmp = TempDir::new().unwrap();
    utils::write_population(tmp.path());

    assert_cmd::cargo::cargo_bin_cmd!("repro-sigma")
        .arg(tmp.path())
        .args(["--alpha", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("alpha must be in (0, 1)"));
}

#[test]
fn test_empty_root_fails() {
    let tmp = TempDir::new().unwrap();

    assert_cmd::cargo::cargo_bin_cmd!("repro-sigma")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No batch folder found"));
}
