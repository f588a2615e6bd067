// tests/integration_test.rs
use std::process::Command;

fn drafter() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_release-drafter"));
    for var in ["GITHUB_TOKEN", "GITHUB_REPOSITORY", "GITHUB_REF", "GITHUB_OUTPUT"] {
        command.env_remove(var);
    }
    command
}

#[test]
fn test_release_drafter_help() {
    let output = drafter()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("release-drafter"));
    assert!(stdout.contains("draft"));
    assert!(stdout.contains("autolabel"));
}

#[test]
fn test_release_drafter_version() {
    let output = drafter()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_repository_fails() {
    let config = tempfile::NamedTempFile::new().unwrap();
    let output = drafter()
        .args(["--config", config.path().to_str().unwrap(), "draft", "--dry-run"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("No repository given"));
}

#[test]
fn test_malformed_repository_fails() {
    let config = tempfile::NamedTempFile::new().unwrap();
    let output = drafter()
        .args([
            "--config",
            config.path().to_str().unwrap(),
            "--repository",
            "just-a-name",
            "--token",
            "t",
            "draft",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("owner/name"));
}

#[test]
fn test_missing_ref_fails_with_hint() {
    let config = tempfile::NamedTempFile::new().unwrap();
    let output = drafter()
        .args([
            "--config",
            config.path().to_str().unwrap(),
            "--repository",
            "o/r",
            "--token",
            "t",
            "--api-url",
            "http://127.0.0.1:9",
            "--graphql-url",
            "http://127.0.0.1:9/graphql",
            "draft",
            "--dry-run",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("No target ref"), "stderr: {}", stderr);
    assert!(stderr.contains("GITHUB_REF"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_latest_value_is_rejected() {
    let output = drafter()
        .args(["draft", "--latest", "sometimes"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}
