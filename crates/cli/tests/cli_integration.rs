//! End-to-end tests for the hush binary

mod common;

use anyhow::Result;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn burst_collapses_to_one_execution() -> Result<()> {
    let dir = TempDir::new()?;
    let result = hush!(
        dir.path(),
        "--json", "--quiet-ms", "150",
        "burst", "--calls", "5", "--gap-ms", "20", "--settle-ms", "500"
    )
    .assert_success()?;

    let report = result.json()?;
    assert_eq!(report["total_executions"], 1);
    assert_eq!(report["phases"][0]["calls"], 5);
    assert_eq!(report["stats"]["submitted"], 5);
    assert_eq!(report["stats"]["superseded"], 4);
    Ok(())
}

#[test]
fn spaced_calls_each_execute() -> Result<()> {
    let dir = TempDir::new()?;
    let result = hush!(
        dir.path(),
        "--json", "--quiet-ms", "30",
        "spaced", "--calls", "3", "--gap-ms", "200", "--settle-ms", "200"
    )
    .assert_success()?;

    let report = result.json()?;
    assert_eq!(report["total_executions"], 3);
    assert_eq!(report["phases"][0]["returned"][0], serde_json::Value::Null);
    assert_eq!(report["phases"][0]["returned"][2], "Call 1");
    Ok(())
}

#[test]
fn demo_runs_both_phases() -> Result<()> {
    let dir = TempDir::new()?;
    let result = hush!(dir.path(), "--quiet-ms", "100", "demo").assert_success()?;

    assert!(result.contains_stdout("Making multiple calls quickly"));
    assert!(result.contains_stdout("executed with:"));
    assert!(result.contains_stdout("Total actual executions"));

    // 5 burst calls collapse to one, 3 spaced calls run separately
    let result = hush!(dir.path(), "--json", "--quiet-ms", "100", "demo").assert_success()?;
    let report = result.json()?;
    assert_eq!(report["phases"][0]["executions"], 1);
    assert_eq!(report["phases"][1]["executions"], 3);
    assert_eq!(report["total_executions"], 4);
    assert!(result.duration < Duration::from_secs(10));
    Ok(())
}

#[test]
fn config_file_is_applied() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("hush.toml");
    fs::write(&path, "quiet_period_ms = 42\nin_flight = \"ignore\"\n")?;
    let path_str = path.to_string_lossy().to_string();

    let result = hush!(dir.path(), "--json", "--config", &path_str, "config", "show")
        .assert_success()?;
    let config = result.json()?;
    assert_eq!(config["quiet_period_ms"], 42);
    assert_eq!(config["in_flight"], "ignore");

    // Flags win over the file
    let result = hush!(
        dir.path(),
        "--json", "--config", &path_str, "--policy", "reschedule",
        "config", "show"
    )
    .assert_success()?;
    assert_eq!(result.json()?["in_flight"], "reschedule");
    Ok(())
}

#[test]
fn config_example_is_valid_toml() -> Result<()> {
    let dir = TempDir::new()?;
    let result = hush!(dir.path(), "config", "example").assert_success()?;
    assert!(result.contains_stdout("quiet_period_ms = 1000"));

    let path = dir.path().join("example.toml");
    fs::write(&path, &result.stdout)?;
    let path_str = path.to_string_lossy().to_string();
    hush!(dir.path(), "--config", &path_str, "config", "show").assert_success()?;
    Ok(())
}

#[test]
fn invalid_settings_fail() -> Result<()> {
    let dir = TempDir::new()?;
    hush!(dir.path(), "--quiet-ms", "99999999", "burst").assert_failure()?;
    hush!(dir.path(), "--policy", "queue", "burst").assert_failure()?;

    let path = dir.path().join("bad.toml");
    fs::write(&path, "quiet_period_ms = -1\n")?;
    let path_str = path.to_string_lossy().to_string();
    hush!(dir.path(), "--config", &path_str, "config", "show").assert_failure()?;
    Ok(())
}
