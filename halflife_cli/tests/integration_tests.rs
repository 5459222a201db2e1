//! Integration tests for the halflife binary.
//!
//! These tests verify end-to-end behavior including:
//! - Series output in every format
//! - Regimen flags layered over config defaults
//! - Rejection of contract violations
//! - Config file handling

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create an isolated config home
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary, pointed away from the user's real config
fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("halflife"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path())
        .env("HOME", temp_dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("Failed to run halflife");
    assert!(output.status.success(), "halflife failed: {:?}", output);
    String::from_utf8(output.stdout).expect("stdout not UTF-8")
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Half-life calculator"));
}

#[test]
fn test_default_command_prints_default_regimen() {
    let temp_dir = setup_test_dir();
    let stdout = stdout_of(&mut cli(&temp_dir));
    let lines: Vec<&str> = stdout.lines().collect();

    // Header plus times 0..=168
    assert_eq!(lines.len(), 170);
    assert!(lines[0].contains("quantity"));
    assert!(lines[1].trim_start().starts_with("0 "));
    assert!(lines[1].ends_with("2.5000"));
}

#[test]
fn test_run_csv() {
    let temp_dir = setup_test_dir();
    let stdout = stdout_of(
        cli(&temp_dir)
            .arg("run")
            .arg("--format")
            .arg("csv")
            .arg("--time-span")
            .arg("7"),
    );
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines[0], "time,quantity");
    assert_eq!(lines.len(), 9);
    assert_eq!(lines[1], "0,2.5");

    let (_, last) = lines[8].split_once(',').unwrap();
    let quantity: f64 = last.parse().unwrap();
    let expected = 2.5 * 0.5_f64.powf(7.0 / 5.0) + 2.5;
    assert!((quantity - expected).abs() < 1e-9);
}

#[test]
fn test_run_json() {
    let temp_dir = setup_test_dir();
    let stdout = stdout_of(
        cli(&temp_dir)
            .arg("run")
            .arg("--format")
            .arg("json")
            .arg("--time-span")
            .arg("3")
            .arg("--dose-interval")
            .arg("1")
            .arg("--dose-increase-intervals")
            .arg("1")
            .arg("--dose-increase")
            .arg("100")
            .arg("--max-dose")
            .arg("50")
            .arg("--initial-dose")
            .arg("0")
            .arg("--half-life")
            .arg("1"),
    );
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    let quantities: Vec<f64> = value["samples"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["quantity"].as_f64().unwrap())
        .collect();
    assert_eq!(quantities, vec![0.0, 50.0, 75.0, 87.5]);
    assert_eq!(value["summary"]["doses"], 4);
    assert!(value["generated_at"].is_string());
}

#[test]
fn test_run_writes_output_file() {
    let temp_dir = setup_test_dir();
    let out_path = temp_dir.path().join("series.csv");

    cli(&temp_dir)
        .arg("run")
        .arg("--format")
        .arg("csv")
        .arg("--output")
        .arg(&out_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 169 samples"));

    let contents = fs::read_to_string(&out_path).expect("Failed to read output");
    assert!(contents.starts_with("time,quantity"));
    assert_eq!(contents.lines().count(), 170);
}

#[test]
fn test_zero_half_life_rejected() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("run")
        .arg("--half-life")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("half-life must be positive"));
}

#[test]
fn test_malformed_half_life_gives_nan_series() {
    let temp_dir = setup_test_dir();
    let stdout = stdout_of(
        cli(&temp_dir)
            .arg("run")
            .arg("--half-life")
            .arg("abc")
            .arg("--time-span")
            .arg("2"),
    );

    let rows: Vec<&str> = stdout.lines().skip(1).collect();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.ends_with("NaN")));
}

#[test]
fn test_malformed_time_span_is_error() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("run")
        .arg("--time-span")
        .arg("a week")
        .assert()
        .failure()
        .stderr(predicate::str::contains("time span"));
}

#[test]
fn test_zero_dose_interval_warns_but_runs() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("run")
        .arg("--dose-interval")
        .arg("0")
        .arg("--time-span")
        .arg("10")
        .assert()
        .success()
        .stderr(predicate::str::contains("dose interval is 0"));
}

#[test]
fn test_schedule_marks_clamped_doses() {
    let temp_dir = setup_test_dir();
    let stdout = stdout_of(cli(&temp_dir).arg("schedule"));
    let lines: Vec<&str> = stdout.lines().collect();

    // Header plus doses at 0, 7, ..., 168
    assert_eq!(lines.len(), 26);
    assert!(lines[25].contains("(clamped)"));
    assert!(!lines[24].contains("(clamped)"));
}

#[test]
fn test_clamp_initial_flag() {
    let temp_dir = setup_test_dir();
    let stdout = stdout_of(
        cli(&temp_dir)
            .arg("run")
            .arg("--format")
            .arg("csv")
            .arg("--initial-dose")
            .arg("30")
            .arg("--time-span")
            .arg("0")
            .arg("--clamp-initial"),
    );
    assert_eq!(stdout.lines().nth(1), Some("0,15.0"));
}

#[test]
fn test_summary() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Doses:              25"))
        .stdout(predicate::str::contains("at t=168"));
}

#[test]
fn test_config_file_supplies_defaults() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("custom.toml");
    fs::write(
        &config_path,
        "[regimen]\ntime_span = 14\n\n[output]\nformat = \"csv\"\n",
    )
    .unwrap();

    let stdout = stdout_of(cli(&temp_dir).arg("--config").arg(&config_path));
    assert!(stdout.starts_with("time,quantity"));
    assert_eq!(stdout.lines().count(), 16);
}

#[test]
fn test_time_span_cap_from_config() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("capped.toml");
    fs::write(&config_path, "[simulation]\nmax_time_span = 100\n").unwrap();

    cli(&temp_dir)
        .arg("--config")
        .arg(&config_path)
        .arg("run")
        .arg("--time-span")
        .arg("101")
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds the maximum"));
}

#[test]
fn test_schedule_respects_time_span_cap() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("capped.toml");
    fs::write(&config_path, "[simulation]\nmax_time_span = 100\n").unwrap();

    cli(&temp_dir)
        .arg("--config")
        .arg(&config_path)
        .arg("schedule")
        .arg("--dose-interval")
        .arg("1")
        .arg("--time-span")
        .arg("5000")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("exceeds the maximum"));

    let stdout = stdout_of(
        cli(&temp_dir)
            .arg("--config")
            .arg(&config_path)
            .arg("schedule")
            .arg("--dose-interval")
            .arg("1")
            .arg("--time-span")
            .arg("100"),
    );
    // Header plus a dose at every step 0..=100
    assert_eq!(stdout.lines().count(), 102);
}

#[test]
fn test_config_init() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("halflife").join("config.toml");

    cli(&temp_dir)
        .arg("config")
        .arg("--init")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote config"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("[regimen]"));
    assert!(contents.contains("max_time_span = 100000"));

    // Refuses to overwrite
    cli(&temp_dir)
        .arg("config")
        .arg("--init")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
