#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn cli(ws: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("horaires-cli").unwrap();
    cmd.arg("--workspace").arg(ws);
    cmd
}

fn seeded() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let ws = dir.path().join("workspace.json");
    cli(&ws)
        .args(["--organization", "acme", "init", "--open", "8", "--close", "18"])
        .assert()
        .success();
    let csv = dir.path().join("employees.csv");
    fs::write(
        &csv,
        "first_name,last_name,availabilities,time_off\nAlice,Martin,2@9-17;3@8-16,2025-10-08\n",
    )
    .unwrap();
    cli(&ws)
        .args(["import-employees", "--csv"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 employee(s)"));
    (dir, ws)
}

#[test]
fn create_then_list() {
    let (_dir, ws) = seeded();
    cli(&ws)
        .args([
            "create",
            "--employee",
            "Alice",
            "--start",
            "2025-10-07T10:00:00Z",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice Martin"));
    cli(&ws)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("(60 min)"));
}

#[test]
fn rejected_placement_exits_with_code_2() {
    let (_dir, ws) = seeded();
    cli(&ws)
        .args([
            "create",
            "--employee",
            "Alice Martin",
            "--start",
            "2025-10-08T09:00:00Z",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("approved time off"));
}

#[test]
fn validate_outside_window() {
    let (_dir, ws) = seeded();
    cli(&ws)
        .args([
            "validate",
            "--employee",
            "Alice",
            "--start",
            "2025-10-07T08:00:00Z",
            "--end",
            "2025-10-07T17:00:00Z",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("outside their availability window"));
}

#[test]
fn coverage_for_one_day() {
    let (_dir, ws) = seeded();
    cli(&ws)
        .args([
            "create",
            "--employee",
            "Alice",
            "--start",
            "2025-10-07T10:00:00Z",
            "--end",
            "2025-10-07T12:00:00Z",
        ])
        .assert()
        .success();
    cli(&ws)
        .args(["coverage", "--day", "2025-10-07"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 2.0 staffed hour(s), 8 uncovered bucket(s)"));
}

#[test]
fn delete_declined_on_stdin_keeps_shift() {
    let (_dir, ws) = seeded();
    let out = cli(&ws)
        .args([
            "create",
            "--employee",
            "Alice",
            "--start",
            "2025-10-07T10:00:00Z",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let line = String::from_utf8(out).unwrap();
    let id = line.split(" | ").next().unwrap().trim().to_string();

    cli(&ws)
        .args(["delete", "--shift-id", &id])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deletion cancelled"));
    cli(&ws)
        .args(["delete", "--shift-id", &id, "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shift deleted"));
}

#[test]
fn validate_refuses_inverted_interval() {
    let (_dir, ws) = seeded();
    cli(&ws)
        .args([
            "validate",
            "--employee",
            "Alice",
            "--start",
            "2025-10-07T17:00:00Z",
            "--end",
            "2025-10-07T09:00:00Z",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("placement accepted").not())
        .stderr(predicate::str::contains("invalid time range"));
}
