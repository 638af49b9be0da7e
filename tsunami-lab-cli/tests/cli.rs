//! End-to-end tests for the tsunami-lab binary.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("tsunami-lab")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("client"))
        .stdout(predicate::str::contains("sanity-check"));
}

#[test]
fn test_run_writes_solution_and_stations() {
    let dir = tempfile::tempdir().unwrap();
    let config = serde_json::json!({
        "setup": "DAMBREAK1D",
        "nx": 10,
        "ny": 1,
        "simulationSizeX": 10.0,
        "endTime": 0.05,
        "writingFrequency": 1,
        "outputFileName": "cli_run",
        "stationFrequency": 0.01,
        "stations": [{ "name": "mid", "locX": 5.0, "locY": 0.0 }]
    });
    let config_path = dir.path().join("config.json");
    std::fs::write(&config_path, serde_json::to_vec_pretty(&config).unwrap()).unwrap();

    Command::cargo_bin("tsunami-lab")
        .unwrap()
        .current_dir(dir.path())
        .args(["run", "-c", "config.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tsunami Lab"));

    assert!(dir.path().join("solutions/cli_run.jsonl").exists());
    assert!(dir.path().join("stations/mid.csv").exists());
    // A completed run leaves no checkpoint behind.
    assert!(!dir.path().join("checkpoints/cli_run.json").exists());
}

#[test]
fn test_run_rejects_missing_config() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("tsunami-lab")
        .unwrap()
        .current_dir(dir.path())
        .args(["run", "-c", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.json"));
}

#[test]
fn test_sanity_check_accepts_reference_data() {
    let file = Path::new(env!("CARGO_MANIFEST_DIR")).join("../resources/middle_states.csv");
    Command::cargo_bin("tsunami-lab")
        .unwrap()
        .args(["sanity-check", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("middle states check passed"));
}

#[test]
fn test_sanity_check_fails_on_bad_reference() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("bad.csv");
    std::fs::write(&file, "5,5,0,0,9999\n").unwrap();
    Command::cargo_bin("tsunami-lab")
        .unwrap()
        .args(["sanity-check", "--file"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("pass rate"));
}
