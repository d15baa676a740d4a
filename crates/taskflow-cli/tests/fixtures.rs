//! Shared helpers for commands that talk to a mock backend.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::json;

/// Writes a token file as if `taskflow login` had succeeded.
pub fn write_tokens(home: &Path, access: &str, refresh: &str) {
    let tokens = json!({"access_token": access, "refresh_token": refresh});
    fs::write(home.join("tokens.json"), tokens.to_string()).unwrap();
}

pub fn read_tokens(home: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(home.join("tokens.json")).unwrap()).unwrap()
}

/// `taskflow` pointed at `home` and the mock server.
pub fn taskflow(home: &Path, base_url: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("taskflow");
    cmd.env("TASKFLOW_HOME", home)
        .env("TASKFLOW_API_URL", base_url)
        .env_remove("TASKFLOW_LOG");
    cmd
}
