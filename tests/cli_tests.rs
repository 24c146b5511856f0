use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hayagriva-llm").unwrap();
    cmd.current_dir(dir.path())
        .env("NO_COLOR", "1")
        .env("XDG_CONFIG_HOME", dir.path().join(".config"))
        .env_remove("OPEN_ROUTER_API_KEY")
        .env_remove("OPENROUTER_API_KEY")
        .env_remove("OPEN_ROUTER_MODEL")
        .env_remove("HAYAGRIVA_LLM_MODEL")
        .env_remove("HAYAGRIVA_LLM_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn package_root() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("package.json"), r#"{"name": "foo", "version": "1.2.0"}"#).unwrap();
    dir
}

#[test]
fn test_generate_creates_then_updates() {
    let dir = package_root();

    cli(&dir)
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created").and(predicate::str::contains("llm.package.json")));
    assert!(dir.path().join("llm.package.json").exists());
    assert!(dir.path().join("llm.package.txt").exists());

    cli(&dir)
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated"));
}

#[test]
fn test_missing_manifest_exits_with_error() {
    let dir = TempDir::new().unwrap();

    cli(&dir)
        .arg("generate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("✗").and(predicate::str::contains("package.json")));
    assert!(!dir.path().join("llm.package.json").exists());
}

#[test]
fn test_ai_mode_requires_key() {
    let dir = package_root();

    cli(&dir)
        .args(["generate", "--mode", "ai"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("AI mode requires --api-key"));
    assert!(!dir.path().join("llm.package.txt").exists());
}

#[test]
fn test_rejects_invalid_endpoint() {
    let dir = package_root();

    cli(&dir)
        .args(["generate", "--mode", "ai", "--api-key", "sk-or-x", "--endpoint", "ftp://example.com"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("http or https"));
}

#[test]
fn test_unknown_mode_is_usage_error() {
    let dir = package_root();

    cli(&dir)
        .args(["generate", "--mode", "magic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("magic"));
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();

    cli(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
