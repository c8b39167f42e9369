// integration tests for the config command

use crate::common::*;
use std::fs;

// ============================================================================
// config path / show / set
// ============================================================================

#[test]
fn test_config_path_follows_env_and_flag() {
    let ws = Workspace::new();

    let output = ws.run(&["config", "path", "--no-json"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_text(&output).trim(),
        ws.config_path().to_str().unwrap()
    );

    let custom = ws.dir.path().join("custom.json");
    let output = ws.run(&["--config", custom.to_str().unwrap(), "config", "path", "--json"]);
    assert_eq!(
        stdout_json(&output)["result"]["path"],
        custom.to_str().unwrap()
    );
}

#[test]
fn test_config_show_defaults_when_missing() {
    let ws = Workspace::new();

    let output = ws.run(&["config", "show", "--json"]);
    assert!(output.status.success());
    let config = &stdout_json(&output)["result"];
    assert_eq!(config["app"]["site"], "US");
    assert_eq!(config["defaults"]["api_surface"], "trait");
    assert!(!ws.config_path().exists());
}

#[test]
fn test_config_set_persists() {
    let ws = Workspace::new();

    let output = ws.run(&["config", "set", "app.site", "eu", "--no-json"]);
    assert!(output.status.success(), "stderr: {}", stderr_text(&output));
    assert_eq!(stdout_text(&output).trim(), "Set app.site = eu");

    let output = ws.run(&["config", "set", "defaults.target", "thing:th.7"]);
    assert!(output.status.success());

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(ws.config_path()).unwrap()).unwrap();
    assert_eq!(saved["app"]["site"], "EU");
    assert_eq!(saved["defaults"]["target"], "thing:th.7");
}

#[test]
fn test_config_set_invalid_is_config_error() {
    let ws = Workspace::new();

    let output = ws.run(&["config", "set", "app.colour", "blue"]);
    assert_eq!(output.status.code(), Some(5));

    let output = ws.run(&["config", "set", "defaults.owner", "owner-without-type"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_unparseable_config_is_config_error() {
    let ws = Workspace::new();
    fs::write(ws.config_path(), "{ nope").unwrap();

    let output = ws.run(&["config", "show", "--no-json"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr_text(&output).contains("Failed to parse config file"));
}

// ============================================================================
// config verify
// ============================================================================

#[test]
fn test_config_verify_valid() {
    let ws = Workspace::new();
    ws.write_complete_config();

    let output = ws.run(&["config", "verify", "--no-json"]);
    assert!(output.status.success(), "stderr: {}", stderr_text(&output));
    assert!(stdout_text(&output).contains("Configuration is valid"));
}

#[test]
fn test_config_verify_lists_problems() {
    let ws = Workspace::new();
    fs::write(ws.config_path(), r#"{"app": {"app_id": "a"}}"#).unwrap();

    let output = ws.run(&["config", "verify", "--json"]);
    assert_eq!(output.status.code(), Some(5));

    let json = stdout_json(&output);
    assert_eq!(json["error"]["code"], -32005);
    let details = json["error"]["data"]["details"].as_array().unwrap();
    assert_eq!(details.len(), 3);
}

#[test]
fn test_config_verify_missing_file() {
    let ws = Workspace::new();

    let output = ws.run(&["config", "verify"]);
    assert_eq!(output.status.code(), Some(5));
}
