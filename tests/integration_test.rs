// tests/integration_test.rs
use std::process::Command;

#[test]
fn test_release_assistant_help() {
    let output = Command::new("cargo")
        .args(["run", "--bin", "release-assistant", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("release-assistant"));
    assert!(stdout.contains("Cut a release"));
    assert!(stdout.contains("--type"));
    assert!(stdout.contains("--show-system-output"));
}
