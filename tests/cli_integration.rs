//! Integration tests for the essh CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.
//! Interactive prompts need a real terminal, so the tests unlock with
//! `ESSH_PASSWORD` and stick to commands that never prompt.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

/// Helper: the essh binary, isolated in `home`.
fn essh(home: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("essh").expect("binary should exist");
    cmd.env("ESSH_HOME", home.path())
        .env_remove("ESSH_PASSWORD")
        .env_remove("ESSH_LOG");
    cmd
}

#[test]
fn help_flag_shows_usage() {
    let home = TempDir::new().unwrap();
    essh(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Encrypted SSH password manager"))
        .stdout(predicate::str::contains("--drop"))
        .stdout(predicate::str::contains("--add"))
        .stdout(predicate::str::contains("--ip_address"))
        .stdout(predicate::str::contains("--change"))
        .stdout(predicate::str::contains("--list"))
        .stdout(predicate::str::contains("--lock"));
}

#[test]
fn add_password_help_does_not_promise_a_prompt() {
    let home = TempDir::new().unwrap();
    essh(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--password"))
        .stdout(predicate::str::contains("prompted").not());
}

#[test]
fn version_flag_shows_version() {
    let home = TempDir::new().unwrap();
    essh(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("essh"));
}

#[test]
fn no_intent_prints_a_hint() {
    let home = TempDir::new().unwrap();
    essh(&home)
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to do"));
}

#[test]
fn conflicting_intents_are_a_usage_error() {
    let home = TempDir::new().unwrap();
    essh(&home)
        .args(["--drop", "--change"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn connect_and_list_conflict() {
    let home = TempDir::new().unwrap();
    essh(&home).args(["--list", "10.0.0.5"]).assert().failure();
}

#[test]
fn data_dir_that_is_a_file_is_fatal() {
    let home = TempDir::new().unwrap();
    let file = home.child("not-a-dir");
    file.write_str("x").unwrap();

    essh(&home)
        .args(["--data-dir", file.path().to_str().unwrap(), "--lock"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn too_few_kdf_iterations_in_config_is_rejected() {
    let home = TempDir::new().unwrap();
    home.child("config.toml")
        .write_str("kdf_iterations = 1000\n")
        .unwrap();

    essh(&home)
        .arg("--lock")
        .assert()
        .failure()
        .stderr(predicate::str::contains("kdf_iterations"));
}

#[test]
fn lock_without_cache_is_harmless() {
    let home = TempDir::new().unwrap();
    essh(&home)
        .arg("--lock")
        .assert()
        .success()
        .stdout(predicate::str::contains("No cached master password"));
}

#[test]
fn list_on_fresh_vault_is_empty() {
    let home = TempDir::new().unwrap();
    essh(&home)
        .env("ESSH_PASSWORD", "hunter22")
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved servers yet"));

    // The salt is created on first use.
    home.child(".salt").assert(predicate::path::exists());
}

#[test]
fn add_without_password_is_reported() {
    let home = TempDir::new().unwrap();
    essh(&home)
        .env("ESSH_PASSWORD", "hunter22")
        .args(["--add", "-i", "10.0.0.5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("needs both"));

    home.child(".essh").assert(predicate::path::missing());
}

#[test]
fn add_then_list_shows_the_server() {
    let home = TempDir::new().unwrap();

    essh(&home)
        .env("ESSH_PASSWORD", "hunter22")
        .args(["-a", "-i", "10.0.0.5", "-p", "p@ss", "-n", "web", "-u", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 10.0.0.5"))
        .stderr(predicate::str::contains("shell history"));

    essh(&home)
        .env("ESSH_PASSWORD", "hunter22")
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("web"))
        .stdout(predicate::str::contains("10.0.0.5"))
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("p@ss").not());
}

#[test]
fn unknown_server_is_not_an_error() {
    let home = TempDir::new().unwrap();
    essh(&home)
        .env("ESSH_PASSWORD", "hunter22")
        .arg("10.9.9.9")
        .assert()
        .success()
        .stderr(predicate::str::contains("No single saved server"));
}

#[test]
fn lock_ignores_an_unreadable_salt() {
    let home = TempDir::new().unwrap();
    // A directory where the salt file should be cannot be read as one.
    home.child(".salt").create_dir_all().unwrap();

    essh(&home).arg("--lock").assert().success();
}

#[test]
fn binary_salt_is_not_fatal() {
    let home = TempDir::new().unwrap();
    home.child(".salt")
        .write_binary(&[0xff, 0xfe, 0x80, 0x00])
        .unwrap();

    essh(&home).arg("--lock").assert().success();

    essh(&home)
        .env("ESSH_PASSWORD", "hunter22")
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved servers yet"));
}
