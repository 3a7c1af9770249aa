//! Binary-level tests that need no running services

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn pmrag(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pmrag").unwrap();
    cmd.current_dir(dir.path()).env_clear();
    cmd
}

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    pmrag(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("ingest"));
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    pmrag(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_missing_postgres_env_names_variable() {
    let dir = TempDir::new().unwrap();
    pmrag(&dir)
        .args(["schema", "--store", "sql"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("POSTGRES_HOST"));
}

#[test]
fn test_missing_api_key_names_variable() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("pmrag.toml"), "[embedding]\nprovider = \"openai\"\n").unwrap();
    pmrag(&dir)
        .args(["search", "--store", "graph", "login"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[agent]\nmax_cycles = 0\n").unwrap();
    pmrag(&dir)
        .args(["--config", config.to_str().unwrap(), "ask", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_cycles"));
}

#[test]
fn test_missing_env_file_is_error() {
    let dir = TempDir::new().unwrap();
    pmrag(&dir)
        .args(["--env-file", "nope.env", "schema"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.env"));
}

#[test]
fn test_filter_table_rejects_bad_column_list_before_connecting() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("required_cols.txt"), "pyid\npylabel; DROP TABLE data\n").unwrap();
    pmrag(&dir)
        .args(["ingest", "filter-table", "--columns", "required_cols.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required_cols.txt"))
        .stderr(predicate::str::contains("POSTGRES_HOST").not());
}

#[test]
fn test_filter_table_missing_column_file() {
    let dir = TempDir::new().unwrap();
    pmrag(&dir)
        .args(["ingest", "filter-table", "--columns", "absent.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.txt"));
}

#[test]
fn test_score_pre_graded_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("graded.csv"),
        "id;difficulty;correct\n1;easy;True\n2;hard;False\n",
    )
    .unwrap();

    pmrag(&dir)
        .args(["eval", "--store", "graph", "--graded", "graded.csv", "--out-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("50.0%"));

    let results = fs::read_to_string(dir.path().join("out/kg-rag/results.json")).unwrap();
    assert!(results.contains("\"num_queries\": 2"));
}
