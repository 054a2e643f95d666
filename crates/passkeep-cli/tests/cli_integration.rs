#![allow(deprecated)] // cargo_bin! macro doesn't exist yet in assert_cmd 2.1

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TEST_PASSWORD: &str = "test-password-123";

fn passkeep(vault: &Path) -> Command {
    let mut cmd = Command::cargo_bin("passkeep").unwrap();
    cmd.env("PASSKEEP_VAULT", vault);
    cmd.env("PASSKEEP_PASSWORD", TEST_PASSWORD);
    cmd
}

fn passkeep_no_password(vault: &Path) -> Command {
    let mut cmd = Command::cargo_bin("passkeep").unwrap();
    cmd.env("PASSKEEP_VAULT", vault);
    cmd.env_remove("PASSKEEP_PASSWORD");
    cmd
}

/// Create an initialized vault and return the TempDir (keeps it alive)
fn create_temp_vault() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let vault_path = temp_dir.path().join("vault.json");

    passkeep(&vault_path).arg("init").assert().success();

    (temp_dir, vault_path)
}

// ============================================================================
// Basic CLI tests
// ============================================================================

#[test]
fn test_help() {
    Command::cargo_bin("passkeep")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Command-line credential vault"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("ls"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("gen"));
}

#[test]
fn test_version() {
    Command::cargo_bin("passkeep")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("passkeep"));
}

// ============================================================================
// Init command tests
// ============================================================================

#[test]
fn test_init_creates_vault_file() {
    let temp_dir = TempDir::new().unwrap();
    let vault_path = temp_dir.path().join("vault.json");

    passkeep(&vault_path)
        .arg("init")
        .assert()
        .success()
        .stderr(predicate::str::contains("Vault initialized"));

    assert!(vault_path.exists());
}

#[test]
fn test_init_twice_fails() {
    let (_temp_dir, vault_path) = create_temp_vault();

    passkeep(&vault_path)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already enrolled"));
}

#[test]
fn test_init_rejects_empty_password() {
    let temp_dir = TempDir::new().unwrap();
    let vault_path = temp_dir.path().join("vault.json");

    passkeep_no_password(&vault_path)
        .env("PASSKEEP_PASSWORD", "")
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not be empty"));
}

// ============================================================================
// Status command tests
// ============================================================================

#[test]
fn test_status_uninitialized_vault() {
    let temp_dir = TempDir::new().unwrap();
    let vault_path = temp_dir.path().join("vault.json");

    passkeep_no_password(&vault_path)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("not initialized"));
}

#[test]
fn test_status_reports_entry_count() {
    let (_temp_dir, vault_path) = create_temp_vault();

    passkeep(&vault_path)
        .args(["add", "example.com", "alice", "--secret", "hunter2"])
        .assert()
        .success();
    passkeep(&vault_path)
        .args(["add", "example.org", "bob", "--secret", "swordfish"])
        .assert()
        .success();

    passkeep_no_password(&vault_path)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries: 2"));
}

#[test]
fn test_status_json_output() {
    let (_temp_dir, vault_path) = create_temp_vault();

    let output = passkeep_no_password(&vault_path)
        .args(["status", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["enrolled"], true);
    assert_eq!(status["entries"], 0);
}

// ============================================================================
// Entry lifecycle tests
// ============================================================================

#[test]
fn test_add_and_ls() {
    let (_temp_dir, vault_path) = create_temp_vault();

    passkeep(&vault_path)
        .args(["add", "example.com", "alice", "--secret", "hunter2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Stored entry"));

    passkeep(&vault_path)
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("example.com"))
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_ls_empty_vault() {
    let (_temp_dir, vault_path) = create_temp_vault();

    passkeep(&vault_path)
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no entries"));
}

#[test]
fn test_show_prints_secret_only() {
    let (_temp_dir, vault_path) = create_temp_vault();

    passkeep(&vault_path)
        .args(["add", "example.com", "alice", "--secret", "hunter2"])
        .assert()
        .success();

    passkeep(&vault_path)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout("hunter2\n");
}

#[test]
fn test_show_unknown_id() {
    let (_temp_dir, vault_path) = create_temp_vault();

    passkeep(&vault_path)
        .args(["show", "42"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("no entry with id 42"));
}

#[test]
fn test_rm_removes_entry() {
    let (_temp_dir, vault_path) = create_temp_vault();

    passkeep(&vault_path)
        .args(["add", "example.com", "alice", "--secret", "hunter2"])
        .assert()
        .success();

    passkeep(&vault_path)
        .args(["rm", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Removed entry 1"));

    passkeep(&vault_path)
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("example.com").not());

    passkeep(&vault_path)
        .args(["show", "1"])
        .assert()
        .failure()
        .code(4);
}

#[test]
fn test_rm_unknown_id_is_not_an_error() {
    let (_temp_dir, vault_path) = create_temp_vault();

    passkeep(&vault_path)
        .args(["rm", "99"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No entry 99"));
}

#[test]
fn test_add_generate_prints_secret_and_round_trips() {
    let (_temp_dir, vault_path) = create_temp_vault();

    let output = passkeep(&vault_path)
        .args(["add", "example.com", "bob", "--generate", "--length", "16"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let generated = String::from_utf8(output.stdout).unwrap().trim_end().to_string();
    assert_eq!(generated.chars().count(), 16);

    passkeep(&vault_path)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{generated}\n")));
}

#[test]
fn test_ls_json_output() {
    let (_temp_dir, vault_path) = create_temp_vault();

    passkeep(&vault_path)
        .args(["add", "example.com", "alice", "--secret", "hunter2"])
        .assert()
        .success();

    let output = passkeep(&vault_path).args(["ls", "--json"]).output().unwrap();
    assert!(output.status.success());

    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listing["entries"][0]["site"], "example.com");
    assert_eq!(listing["entries"][0]["account"], "alice");
    assert!(listing["entries"][0].get("sealed_secret").is_none());
}

// ============================================================================
// Authentication and error handling tests
// ============================================================================

#[test]
fn test_wrong_password_fails() {
    let (_temp_dir, vault_path) = create_temp_vault();

    passkeep_no_password(&vault_path)
        .env("PASSKEEP_PASSWORD", "wrong-password")
        .arg("ls")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("master password"));
}

#[test]
fn test_entry_commands_require_initialized_vault() {
    let temp_dir = TempDir::new().unwrap();
    let vault_path = temp_dir.path().join("vault.json");

    passkeep(&vault_path)
        .arg("ls")
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("enrolled"));
}

#[test]
fn test_password_stdin() {
    let (_temp_dir, vault_path) = create_temp_vault();

    passkeep_no_password(&vault_path)
        .arg("--password-stdin")
        .arg("ls")
        .write_stdin(format!("{TEST_PASSWORD}\n"))
        .assert()
        .success();
}

#[test]
fn test_corrupt_vault_file_is_reported() {
    let (_temp_dir, vault_path) = create_temp_vault();

    std::fs::write(&vault_path, "this is not json").unwrap();

    passkeep(&vault_path)
        .arg("ls")
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("corrupt"));
}

#[test]
fn test_tampered_entry_is_reported() {
    let (_temp_dir, vault_path) = create_temp_vault();

    passkeep(&vault_path)
        .args(["add", "example.com", "alice", "--secret", "hunter2"])
        .assert()
        .success();

    // Swap one character inside the stored token
    let contents = std::fs::read_to_string(&vault_path).unwrap();
    let marker = "\"sealed_secret\": \"";
    let start = contents.find(marker).unwrap() + marker.len();
    let mut chars: Vec<char> = contents.chars().collect();
    chars[start + 4] = if chars[start + 4] == 'A' { 'B' } else { 'A' };
    std::fs::write(&vault_path, chars.into_iter().collect::<String>()).unwrap();

    passkeep(&vault_path)
        .args(["show", "1"])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("authentication"));

    // The tampered entry is reported, not dropped
    passkeep(&vault_path)
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("example.com"));
}

// ============================================================================
// Generator tests
// ============================================================================

#[test]
fn test_gen_default_length() {
    let output = Command::cargo_bin("passkeep")
        .unwrap()
        .arg("gen")
        .output()
        .unwrap();
    assert!(output.status.success());

    let password = String::from_utf8(output.stdout).unwrap();
    assert_eq!(password.trim_end().chars().count(), 12);
}

#[test]
fn test_gen_respects_class_flags() {
    let output = Command::cargo_bin("passkeep")
        .unwrap()
        .args(["gen", "--length", "32", "--digits"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let password = String::from_utf8(output.stdout).unwrap();
    let password = password.trim_end();
    assert_eq!(password.len(), 32);
    assert!(password.chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn test_gen_needs_no_vault_or_password() {
    let mut cmd = Command::cargo_bin("passkeep").unwrap();
    cmd.env_remove("PASSKEEP_VAULT");
    cmd.env_remove("PASSKEEP_PASSWORD");

    cmd.args(["gen", "--length", "20"]).assert().success();
}
