//! End-to-end tests of the `openpoint` binary.

use assert_cmd::Command;
use predicates::prelude::*;

/// A port nothing listens on.
const DEAD_API: &str = "http://127.0.0.1:9/api";

fn openpoint() -> Command {
    let mut cmd = Command::cargo_bin("openpoint").unwrap();
    cmd.env_remove("OPENPOINT_API").env_remove("OPENPOINT_TOKEN");
    cmd
}

#[test]
fn help_lists_command_groups() {
    openpoint()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("types"))
        .stdout(predicate::str::contains("connectors"))
        .stdout(predicate::str::contains("--offline"));
}

#[test]
fn offline_types_list_shows_builtin_set() {
    openpoint()
        .args(["--offline", "types", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("salesforce"))
        .stdout(predicate::str::contains("azure_blob"))
        .stdout(predicate::str::contains("Total: 10 type(s) (builtin)"));
}

#[test]
fn unreachable_registry_falls_back_to_builtin() {
    openpoint()
        .args(["--api", DEAD_API, "--timeout-secs", "2", "types", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 10 type(s) (builtin)"));
}

#[test]
fn types_show_renders_database_form() {
    openpoint()
        .args(["--offline", "--format", "json", "types", "show", "database"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"key\": \"db_type\""))
        .stdout(predicate::str::contains("\"widget\": \"choice\""))
        .stdout(predicate::str::contains("\"widget\": \"masked\""));
}

#[test]
fn types_show_unknown_type_fails() {
    openpoint()
        .args(["--offline", "types", "show", "mainframe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown connector type: mainframe"));
}

#[test]
fn types_check_passes_for_builtin_set() {
    openpoint()
        .args(["--offline", "types", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 defect(s)"));
}

#[test]
fn create_reports_field_errors_before_contacting_backend() {
    openpoint()
        .args([
            "--api",
            DEAD_API,
            "--offline",
            "connectors",
            "create",
            "database",
            "--name",
            "Orders DB",
            "--set",
            "db_type=PostgreSQL",
            "--set",
            "port=5432",
            "--set",
            "database=orders",
            "--set",
            "username=app",
            "--set",
            "password=pw",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("host: Host is required"))
        .stderr(predicate::str::contains("database: Database is required").not());
}

#[test]
fn create_rejects_non_numeric_port() {
    openpoint()
        .args([
            "--api", DEAD_API, "--offline", "connectors", "create", "email", "--name", "Mail",
            "--set", "host=smtp.example.com", "--set", "port=smtp", "--set", "username=ops",
            "--set", "password=pw",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("port: Port must be a number"));
}

#[test]
fn create_rejects_unknown_field() {
    openpoint()
        .args([
            "--offline", "connectors", "create", "kafka", "--name", "Events", "--set",
            "topic=orders",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("topic"));
}

#[test]
fn connectors_list_without_backend_fails() {
    openpoint()
        .args(["--api", DEAD_API, "--timeout-secs", "2", "connectors", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("connection error"));
}
