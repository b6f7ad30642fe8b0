//! Integration tests for the `wolbot` CLI binary.
//!
//! These tests cover argument parsing, help output, shell completions,
//! local command execution against a temporary registry, and exit codes.
//! Nothing here needs network credentials.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `wolbot` binary with env isolation.
///
/// Points HOME and XDG dirs into `dir`, runs from `dir`, and clears the
/// credential and override variables so the user's setup never leaks in.
fn wolbot_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("wolbot");
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("LINE_CHANNEL_SECRET")
        .env_remove("LINE_CHANNEL_ACCESS_TOKEN");
    for (key, _) in std::env::vars() {
        if key.starts_with("WOLBOT_") {
            cmd.env_remove(key);
        }
    }
    cmd
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn data_file(&self) -> PathBuf {
        self.dir.path().join("data.json")
    }

    fn config_file(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = wolbot_cmd(self.dir.path());
        cmd.arg("--config")
            .arg(self.config_file())
            .arg("--data-file")
            .arg(self.data_file());
        cmd
    }

    fn exec(&self, user: &str, text: &str) -> assert_cmd::assert::Assert {
        self.cmd().args(["exec", "--user", user, text]).assert()
    }

    fn records(&self) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(self.data_file()).unwrap()).unwrap()
    }
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let ws = Workspace::new();
    let output = wolbot_cmd(ws.dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    let ws = Workspace::new();
    wolbot_cmd(ws.dir.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("Wake-on-LAN")
            .and(predicate::str::contains("serve"))
            .and(predicate::str::contains("exec"))
            .and(predicate::str::contains("devices")),
    );
}

#[test]
fn test_version_flag() {
    let ws = Workspace::new();
    wolbot_cmd(ws.dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wolbot"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let ws = Workspace::new();
    wolbot_cmd(ws.dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let ws = Workspace::new();
    wolbot_cmd(ws.dir.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── exec ────────────────────────────────────────────────────────────

#[test]
fn test_exec_registers_mac_then_ip() {
    let ws = Workspace::new();

    ws.exec("U1", "#AA-BB-CC-DD-EE-FF")
        .success()
        .stdout(predicate::str::contains("aa:bb:cc:dd:ee:ff"));
    let records = ws.records();
    assert_eq!(records[0]["userId"], "U1");
    assert_eq!(records[0]["mac"], "aa:bb:cc:dd:ee:ff");
    assert_eq!(records[0]["ip"], serde_json::Value::Null);

    ws.exec("U1", "@10.0.0.5")
        .success()
        .stdout(predicate::str::contains("10.0.0.5"));
    assert_eq!(ws.records()[0]["ip"], "10.0.0.5");
}

#[test]
fn test_exec_json_output_carries_outcome_tag() {
    let ws = Workspace::new();
    let output = ws
        .cmd()
        .args(["-o", "json", "exec", "--user", "U2", "poweron"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["outcome"], "not_registered");
    assert!(report["reply"].as_str().unwrap().contains("not registered"));
}

#[test]
fn test_exec_invalid_mac_leaves_registry_empty() {
    let ws = Workspace::new();
    ws.exec("U1", "#not-a-mac")
        .success()
        .stdout(predicate::str::contains("Invalid MAC"));
    assert_eq!(ws.records(), serde_json::json!([]));
}

#[test]
fn test_exec_ignored_text_prints_nothing() {
    let ws = Workspace::new();
    ws.exec("U1", "hello there")
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_exec_help() {
    let ws = Workspace::new();
    ws.exec("U1", "?")
        .success()
        .stdout(predicate::str::contains("poweron").and(predicate::str::contains("status")));
}

// ── devices ─────────────────────────────────────────────────────────

#[test]
fn test_devices_list_json() {
    let ws = Workspace::new();
    ws.exec("U1", "#aa:bb:cc:dd:ee:ff").success();
    ws.exec("U2", "#11:22:33:44:55:66").success();

    let output = ws.cmd().args(["devices", "list", "-o", "json"]).output().unwrap();
    assert!(output.status.success());
    let list: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(list.as_array().unwrap().len(), 2);
    assert_eq!(list[1]["userId"], "U2");
}

#[test]
fn test_devices_list_plain() {
    let ws = Workspace::new();
    ws.exec("U1", "#aa:bb:cc:dd:ee:ff").success();
    ws.cmd()
        .args(["devices", "list", "-o", "plain"])
        .assert()
        .success()
        .stdout("U1\n");
}

#[test]
fn test_devices_show_unknown_user() {
    let ws = Workspace::new();
    let output = ws.cmd().args(["devices", "show", "U404"]).output().unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("U404"));
}

#[test]
fn test_corrupt_registry_is_storage_error() {
    let ws = Workspace::new();
    std::fs::write(ws.data_file(), "{ not json").unwrap();

    let output = ws.cmd().args(["devices", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(10));
    assert_eq!(std::fs::read_to_string(ws.data_file()).unwrap(), "{ not json");
}

// ── wake / probe validation ─────────────────────────────────────────

#[test]
fn test_wake_rejects_invalid_mac() {
    let ws = Workspace::new();
    let output = ws.cmd().args(["wake", "zz:zz"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_probe_rejects_invalid_host() {
    let ws = Workspace::new();
    let output = ws.cmd().args(["probe", "999.1.1.1"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── config ──────────────────────────────────────────────────────────

#[test]
fn test_config_init_refuses_overwrite() {
    let ws = Workspace::new();
    ws.cmd().args(["config", "init"]).assert().success();
    assert!(ws.config_file().exists());

    let output = ws.cmd().args(["config", "init"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("--force"));

    ws.cmd().args(["config", "init", "--force"]).assert().success();
}

#[test]
fn test_config_show_masks_secrets() {
    let ws = Workspace::new();
    std::fs::write(
        ws.config_file(),
        "[line]\nchannel_secret = \"super-secret-value\"\n",
    )
    .unwrap();

    ws.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("super-secret-value")
                .not()
                .and(predicate::str::contains("********")),
        );
}

#[test]
fn test_config_path_honours_flag() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── serve ───────────────────────────────────────────────────────────

#[test]
fn test_serve_without_credentials() {
    let ws = Workspace::new();
    let output = ws.cmd().arg("serve").output().unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("LINE_CHANNEL_SECRET"));
}
