//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `dsviz` command pointed at a config path that does not exist yet
fn dsviz(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dsviz").unwrap();
    cmd.env("DSVIZ_CONFIG", dir.path().join("config.toml"));
    cmd
}

// === Top level ===

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    dsviz(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("hash"))
        .stdout(predicate::str::contains("maze"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    dsviz(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dsviz"));
}

#[test]
fn test_play_help_lists_tabs() {
    let dir = TempDir::new().unwrap();
    dsviz(&dir)
        .args(["play", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("array"))
        .stdout(predicate::str::contains("maze"));
}

// === Hash Command Tests ===

#[test]
fn test_hash_reports_collision() {
    let dir = TempDir::new().unwrap();
    dsviz(&dir)
        .args(["hash", "cat=x", "act=y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("c(99) + a(97) + t(116) = 312 % 8 = 0"))
        .stdout(predicate::str::contains("Collision Detected"))
        .stdout(predicate::str::contains("already contains: cat"))
        .stdout(predicate::str::contains("[0] cat: x -> act: y"));
}

#[test]
fn test_hash_update_is_not_a_collision() {
    let dir = TempDir::new().unwrap();
    dsviz(&dir)
        .args(["hash", "cat=x", "cat=z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("update cat=z"))
        .stdout(predicate::str::contains("Collision").not())
        .stdout(predicate::str::contains("[0] cat: z"));
}

#[test]
fn test_hash_custom_buckets() {
    let dir = TempDir::new().unwrap();
    dsviz(&dir)
        .args(["hash", "--buckets", "3", "a=1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a(97) = 97 % 3 = 1"))
        .stdout(predicate::str::contains("[2] (empty pod)"));
}

#[test]
fn test_hash_rejects_bad_entry() {
    let dir = TempDir::new().unwrap();
    dsviz(&dir)
        .args(["hash", "cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected key=value"));
}

#[test]
fn test_hash_rejects_zero_buckets() {
    let dir = TempDir::new().unwrap();
    dsviz(&dir).args(["hash", "--buckets", "0", "a=1"]).assert().failure();
}

// === Maze Command Tests ===

#[test]
fn test_maze_json() {
    let dir = TempDir::new().unwrap();
    dsviz(&dir)
        .args(["maze", "--seed", "7", "--steps", "2", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"nodes\""))
        .stdout(predicate::str::contains("\"edges\""))
        .stdout(predicate::str::contains("\"is_agent\": true"));
}

#[test]
fn test_maze_grid_output() {
    let dir = TempDir::new().unwrap();
    dsviz(&dir)
        .args(["maze", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("step 1: (0, 1) ->"))
        .stdout(predicate::str::contains("@"));
}

#[test]
fn test_maze_same_seed_same_walk() {
    let dir = TempDir::new().unwrap();
    let run = |dir: &TempDir| {
        dsviz(dir)
            .args(["maze", "--seed", "42", "--steps", "5"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(&dir), run(&dir));
}

// === Config Command Tests ===

#[test]
fn test_config_path_honours_env() {
    let dir = TempDir::new().unwrap();
    dsviz(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_then_show() {
    let dir = TempDir::new().unwrap();
    dsviz(&dir).args(["config", "init"]).assert().success();
    assert!(dir.path().join("config.toml").exists());

    dsviz(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("buckets = 8"))
        .stdout(predicate::str::contains("step_delay_ms = 500"));

    // second init refuses without --force
    dsviz(&dir).args(["config", "init"]).assert().failure();
    dsviz(&dir).args(["config", "init", "--force"]).assert().success();
}

#[test]
fn test_config_validate_rejects_bad_layout() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[maze]\nlayout = [\"OOX\", \"TOO\"]\n",
    )
    .unwrap();

    dsviz(&dir).args(["config", "validate"]).assert().failure();
    dsviz(&dir).args(["hash", "a=1"]).assert().failure();
}

#[test]
fn test_explicit_config_flag_wins() {
    let dir = TempDir::new().unwrap();
    let other = dir.path().join("other.toml");
    std::fs::write(&other, "[hash]\nbuckets = 3\n").unwrap();

    dsviz(&dir)
        .arg("--config")
        .arg(&other)
        .args(["hash", "a=1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("% 3 = 1"));
}

// === Completions ===

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    dsviz(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dsviz"));
}
