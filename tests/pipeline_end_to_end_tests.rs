//! Library-level end-to-end runs over on-disk datasets

mod utils;

use repro_sigma::config::ReproConfig;
use repro_sigma::manifest::DatasetManifest;
use repro_sigma::pipeline::Pipeline;
use repro_sigma::store::FsGridStore;
use repro_sigma::validation::Decision;
use std::fs;
use tempfile::TempDir;

fn run(root: &std::path::Path, config: &ReproConfig) -> repro_sigma::pipeline::RunReport {
    let manifest = DatasetManifest::discover(root, config).unwrap();
    let store = FsGridStore::from_config(config);
    Pipeline::new(&store, config).run(&manifest)
}

#[test]
fn test_population_scores_and_verdict() {
    let tmp = TempDir::new().unwrap();
    utils::write_population(tmp.path());
    let config = ReproConfig::default();

    let report = run(tmp.path(), &config);

    assert_eq!(report.sample.len(), 3);
    let expected = [0.010, 0.012, 0.014].map(|d: f64| d / 2.0f64.sqrt());
    for (score, expected) in report.sample.scores().iter().zip(expected) {
        assert!((score.sigma - expected).abs() < 1e-9, "{:?}", score);
    }

    let stats = report.population.unwrap();
    assert_eq!(stats.best.label(), "batch_001");
    assert_eq!(stats.worst.label(), "batch_003");

    let verdict = report.verdict.unwrap();
    assert!((verdict.mean - 0.012 / 2.0f64.sqrt() * 1000.0).abs() < 1e-6);
    assert_eq!(verdict.t_test, Decision::Adequate);
    assert_eq!(verdict.confidence_rule, Decision::Adequate);
}

#[test]
fn test_corrupt_scan_is_contained() {
    let tmp = TempDir::new().unwrap();
    utils::write_population(tmp.path());
    let rep = tmp.path().join("batch_002/dsi/dsi_01");
    fs::write(rep.join("scan_3.csv"), "1.0,abc\n").unwrap();
    let config = ReproConfig {
        write_outputs: false,
        ..ReproConfig::default()
    };

    let report = run(tmp.path(), &config);

    assert_eq!(report.sample.len(), 3);
    let subject = &report.subjects[1];
    assert_eq!(subject.failures.len(), 1);
    assert_eq!(subject.failures[0].kind, "ReadFailure");
    assert_eq!(subject.repetitions[0].scans_used, 2);
    assert!(report.verdict.is_some());
}

#[test]
fn test_missing_dsi_folder_and_repetition_gaps() {
    let tmp = TempDir::new().unwrap();
    utils::write_population(tmp.path());
    fs::create_dir_all(tmp.path().join("batch_004")).unwrap();
    // dsi_01 and dsi_03 only
    let dsi = utils::write_subject(tmp.path(), "batch_005", (3, 4), &[1.0, 9.0, 1.01]);
    fs::remove_dir_all(dsi.join("dsi_02")).unwrap();
    let config = ReproConfig {
        write_outputs: false,
        ..ReproConfig::default()
    };

    let report = run(tmp.path(), &config);

    assert_eq!(report.subjects.len(), 5);
    assert_eq!(report.subjects[3].sigma, None);
    assert_eq!(report.subjects[3].failures[0].kind, "EmptyInput");

    let gapped = &report.subjects[4];
    assert_eq!(gapped.repetitions_used, 2);
    assert!((gapped.sigma.unwrap() - 0.01 / 2.0f64.sqrt()).abs() < 1e-9);
    assert_eq!(report.sample.len(), 4);
}

#[test]
fn test_shape_mismatch_excludes_repetition() {
    let tmp = TempDir::new().unwrap();
    utils::write_population(tmp.path());
    let odd = tmp.path().join("batch_003/dsi/dsi_02");
    utils::write_scan(&odd, "scan_3.csv", &utils::constant_rows(3, 3, 0.0, false));
    let config = ReproConfig {
        write_outputs: false,
        ..ReproConfig::default()
    };

    let report = run(tmp.path(), &config);

    // batch_003 is left with one repetition and no score
    let subject = &report.subjects[2];
    assert_eq!(subject.sigma, None);
    let kinds: Vec<&str> = subject.failures.iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec!["DimensionMismatch", "InsufficientSample"]);
    assert_eq!(report.sample.len(), 2);
}

#[test]
fn test_explicit_manifest_matches_discovery() {
    let tmp = TempDir::new().unwrap();
    utils::write_population(tmp.path());
    let config = ReproConfig {
        write_outputs: false,
        ..ReproConfig::default()
    };

    let discovered = DatasetManifest::discover(tmp.path(), &config).unwrap();
    let path = tmp.path().join("manifest.toml");
    fs::write(&path, toml::to_string(&discovered).unwrap()).unwrap();
    let loaded = DatasetManifest::from_toml(&path).unwrap();
    assert_eq!(loaded, discovered);

    let store = FsGridStore::from_config(&config);
    let a = Pipeline::new(&store, &config).run(&discovered);
    let b = Pipeline::new(&store, &config).run(&loaded);
    assert_eq!(a.sample, b.sample);
}

#[test]
fn test_legacy_sentinel_decodes_as_missing() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("batch_001/dsi/dsi_01");
    utils::write_scan(
        &dir,
        "scan_1.csv",
        &[vec!["-999.9999".to_string(), "1.0".to_string()]],
    );
    let dir = tmp.path().join("batch_001/dsi/dsi_02");
    utils::write_scan(
        &dir,
        "scan_1.csv",
        &[vec!["2.0".to_string(), "1.5".to_string()]],
    );
    let config = ReproConfig::default();

    let report = run(tmp.path(), &config);

    let subject = &report.subjects[0];
    assert_eq!(subject.sigma_cells, 1);
    assert!((subject.sigma.unwrap() - 0.5 / 2.0f64.sqrt()).abs() < 1e-12);

    let mean = fs::read_to_string(tmp.path().join("batch_001/dsi/dsi_mean_001.csv")).unwrap();
    assert_eq!(mean, "2.0000,1.2500\n");
}
