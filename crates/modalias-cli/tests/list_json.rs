//! Integration tests for `modalias list`.

use serial_test::serial;
use std::process::Command;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-q", "-p", "modalias-cli", "--bin", "modalias", "--"]);
    cmd
}

#[test]
#[serial]
fn test_list_json_is_priority_ordered() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("modalias.json"),
        r#"{"aliases": {"@z": "./z", "@app/sub": "./sub", "@app": "./app"}}"#,
    )
    .unwrap();

    let output = cargo_bin()
        .arg("--json")
        .arg("--cwd")
        .arg(dir.path())
        .arg("list")
        .output()
        .expect("Failed to run list command");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");

    let keys: Vec<&str> = json["aliases"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["@app", "@app/sub", "@z"]);
    assert_eq!(json["aliases"][0]["priority"], 1);
}

#[test]
#[serial]
fn test_list_human_without_aliases() {
    let dir = tempfile::tempdir().unwrap();

    let output = cargo_bin()
        .arg("--cwd")
        .arg(dir.path())
        .args(["list", "--no-config"])
        .output()
        .expect("Failed to run list command");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Config: (none)"));
    assert!(stdout.contains("No aliases registered."));
}

#[test]
#[serial]
fn test_version_json() {
    let output = cargo_bin()
        .args(["--json", "version"])
        .output()
        .expect("Failed to run version command");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert!(json["version"].is_string());
    assert_eq!(json["schema_version"], 1);
}
