use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("taskflow")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("projects"))
        .stdout(predicate::str::contains("tasks"))
        .stdout(predicate::str::contains("subscriptions"))
        .stdout(predicate::str::contains("notifications"))
        .stdout(predicate::str::contains("activity"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_tasks_help_shows_subcommands() {
    cargo_bin_cmd!("taskflow")
        .args(["tasks", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("toggle"))
        .stdout(predicate::str::contains("add-dependency"));
}

#[test]
fn test_invalid_status_is_rejected() {
    cargo_bin_cmd!("taskflow")
        .args(["tasks", "status", "1", "done"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown status"));
}
