//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_sidekick"))
        .args(args)
        .env("SIDEKICK_DATA_DIR", data_dir)
        .env("SIDEKICK_LOG", "off")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

#[test]
fn test_config_defaults_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["config", "get", "timer.default_seconds"]);
    assert_eq!(out.trim(), "1500");
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_set_and_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["config", "set", "hints.study_xp", "9"]);
    let out = run_ok(dir.path(), &["config", "get", "hints.study_xp"]);
    assert_eq!(out.trim(), "9");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "hints.nope", "1"]);
    assert_ne!(code, 0);
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "hints.study_xp", "lots"]);
    assert_ne!(code, 0);
}

#[test]
fn test_chat_remembers_name_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["chat", "-m", "my name is Riya"]);
    let out = run_ok(dir.path(), &["chat", "--json", "-m", "hello"]);
    let response: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(response["handled_by"], "small_talk");
    // Persona styling may upper-case or space out the letters.
    let text = response["text"].as_str().unwrap().to_lowercase().replace(' ', "");
    assert!(text.contains("riya"), "{text}");
}

#[test]
fn test_chat_counts_commands() {
    let dir = tempfile::tempdir().unwrap();
    for _ in 0..2 {
        run_ok(dir.path(), &["chat", "-m", "hello"]);
    }
    let out = run_ok(dir.path(), &["game", "daily"]);
    let quests: serde_json::Value = serde_json::from_str(&out).unwrap();
    let commands = quests
        .as_array()
        .unwrap()
        .iter()
        .find(|q| q["id"] == "commands5")
        .unwrap();
    assert_eq!(commands["progress"], 2);
    assert_eq!(commands["done"], false);
}

#[test]
fn test_game_mode_and_xp() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["game", "mode", "Coding"]);
    assert_eq!(out.trim(), "mode set to coding");

    let out = run_ok(dir.path(), &["game", "xp", "coding", "10"]);
    let award: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(award["gained"], 12);

    let out = run_ok(dir.path(), &["game", "status"]);
    assert!(out.contains("mode=coding"));
}

#[test]
fn test_todo_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["todo", "add", "read chapter 3"]);
    assert_eq!(out.trim(), "Item created: 1");

    let out = run_ok(dir.path(), &["todo", "done", "1"]);
    let item: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(item["done"], true);

    let (_, _, code) = run_cli(dir.path(), &["todo", "done", "42"]);
    assert_ne!(code, 0);

    run_ok(dir.path(), &["todo", "remove", "1"]);
    let out = run_ok(dir.path(), &["todo", "list"]);
    assert_eq!(out.trim(), "[]");
}

#[test]
fn test_reminders_persist_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["remind", "add", "call mom", "--in", "60"]);
    let out = run_ok(dir.path(), &["remind", "list"]);
    let list: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(list[0]["text"], "call mom");

    run_ok(dir.path(), &["remind", "remove", "1"]);
    let (_, _, code) = run_cli(dir.path(), &["remind", "remove", "1"]);
    assert_ne!(code, 0);
}

#[test]
fn test_timer_run_reports_events() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["timer", "run", "--seconds", "1", "--mode", "mini"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("\"type\":\"timer_started\""));
    assert!(stderr.contains("\"type\":\"timer_done\""));
}
