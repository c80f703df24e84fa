#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ctf_reset(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ctf-reset").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("MYSQL_HOST")
        .env_remove("MYSQL_PORT")
        .env_remove("INIT_SQL_PATH")
        .env_remove("RESET_INTERVAL");
    cmd
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    ctf_reset(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("once"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn help_hides_the_root_password_value() {
    let dir = TempDir::new().unwrap();
    ctf_reset(&dir)
        .env("MYSQL_ROOT_PASSWORD", "hunter2")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter2").not());
}

// ---------------------------------------------------------------------------
// once
// ---------------------------------------------------------------------------

#[test]
fn once_with_missing_seed_file_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("init.sql");
    ctf_reset(&dir)
        .args(["once", "--init-sql-path"])
        .arg(&missing)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Reset failed").not())
        .stderr(predicate::str::contains("init.sql not found at"));
}

#[test]
fn once_json_reports_the_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("init.sql");
    let output = ctf_reset(&dir)
        .args(["once", "--json", "--init-sql-path"])
        .arg(&missing)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "error");
    assert!(json["message"]
        .as_str()
        .unwrap()
        .starts_with("init.sql not found at"));
}

#[test]
fn seed_path_can_come_from_the_environment() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("from-env.sql");
    ctf_reset(&dir)
        .env("INIT_SQL_PATH", &missing)
        .arg("once")
        .assert()
        .failure()
        .stderr(predicate::str::contains("from-env.sql"));
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_fails_when_database_is_unreachable() {
    let dir = TempDir::new().unwrap();
    ctf_reset(&dir)
        .args([
            "check",
            "--mysql-host",
            "127.0.0.1",
            "--mysql-port",
            "1",
            "--db-wait-retries",
            "1",
            "--db-connect-timeout",
            "2",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("database check failed"))
        .stderr(predicate::str::contains("database unreachable after 1 attempt(s)"));
}
