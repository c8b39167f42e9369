// integration tests for the trigger commands

use crate::common::*;
use serde_json::json;

fn write_inputs(ws: &Workspace) -> (String, String, String) {
    let state = ws.write_json(
        "state_predicate.json",
        &json!({
            "eventSource": "STATES",
            "triggersWhen": "CONDITION_FALSE_TO_TRUE",
            "condition": { "type": "eq", "field": "power", "value": false }
        }),
    );
    let schedule = ws.write_json(
        "schedule_predicate.json",
        &json!({ "eventSource": "SCHEDULE", "schedule": "0 9 * * mon-fri" }),
    );
    let command = ws.write_json(
        "command.json",
        &json!({ "actions": [{ "turnPower": { "power": true } }], "title": "power on" }),
    );
    (state, schedule, command)
}

#[test]
fn test_trigger_new_builds_request() {
    let ws = Workspace::new();
    ws.write_complete_config();
    let (state, _, command) = write_inputs(&ws);

    let output = ws.run(&[
        "trigger", "new", "--predicate", &state, "--command", &command, "--title", "wake", "--json",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr_text(&output));

    let request = &stdout_json(&output)["result"];
    assert_eq!(request["method"], "POST");
    assert_eq!(
        request["url"],
        "https://api-jp.kii.com/thing-if/apps/app-1/targets/thing:th.1/triggers"
    );
    assert_eq!(request["headers"]["Content-Type"], "application/json");
    assert_eq!(request["headers"]["X-Kii-AppID"], "app-1");
    assert_eq!(request["headers"]["X-Kii-AppKey"], "key-1");

    let body = &request["body"];
    assert_eq!(body["triggersWhat"], "COMMAND");
    assert_eq!(body["title"], "wake");
    assert_eq!(body["predicate"]["eventSource"], "STATES");
    assert_eq!(body["command"]["issuer"], "user:owner-1");
    assert_eq!(body["command"]["target"], "thing:th.1");
    assert_eq!(body["command"]["title"], "power on");
}

#[test]
fn test_trigger_new_non_trait_rejects_schedule() {
    let ws = Workspace::new();
    ws.write_complete_config();
    let (_, schedule, command) = write_inputs(&ws);

    let output = ws.run(&["config", "set", "defaults.api_surface", "nontrait"]);
    assert!(output.status.success(), "stderr: {}", stderr_text(&output));

    let output = ws.run(&[
        "trigger", "new", "--predicate", &schedule, "--command", &command, "--json",
    ]);
    assert_eq!(output.status.code(), Some(3));

    // trait surface takes it
    let output = ws.run(&["config", "set", "defaults.api_surface", "trait"]);
    assert!(output.status.success());
    let output = ws.run(&[
        "trigger", "new", "--predicate", &schedule, "--command", &command, "--json",
    ]);
    assert!(output.status.success());
}

#[test]
fn test_trigger_new_without_config_is_config_error() {
    let ws = Workspace::new();
    let (state, _, command) = write_inputs(&ws);

    let output = ws.run(&["trigger", "new", "--predicate", &state, "--command", &command]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_trigger_patch() {
    let ws = Workspace::new();
    ws.write_complete_config();
    let (state, _, _) = write_inputs(&ws);

    let output = ws.run(&["trigger", "patch", "tr-1", "--json"]);
    assert_eq!(output.status.code(), Some(3));

    let output = ws.run(&["trigger", "patch", "tr-1", "--predicate", &state, "--json"]);
    assert!(output.status.success());
    let request = &stdout_json(&output)["result"];
    assert_eq!(request["method"], "PATCH");
    assert!(request["url"].as_str().unwrap().ends_with("/triggers/tr-1"));
    assert!(request["body"].get("command").is_none());
}

#[test]
fn test_trigger_simple_requests() {
    let ws = Workspace::new();
    ws.write_complete_config();

    let output = ws.run(&["trigger", "disable", "tr-1", "--json"]);
    let request = &stdout_json(&output)["result"];
    assert_eq!(request["method"], "PUT");
    assert!(request["url"].as_str().unwrap().ends_with("/triggers/tr-1/disable"));
    assert!(request["body"].is_null());

    let output = ws.run(&["trigger", "enable", "tr-1", "--json"]);
    let request = &stdout_json(&output)["result"];
    assert_eq!(request["method"], "PUT");
    assert!(request["url"].as_str().unwrap().ends_with("/triggers/tr-1/enable"));

    let output = ws.run(&["trigger", "delete", "tr-1", "--target", "thing:th.9", "--json"]);
    let request = &stdout_json(&output)["result"];
    assert_eq!(request["method"], "DELETE");
    assert!(request["url"].as_str().unwrap().contains("/targets/thing:th.9/"));

    let output = ws.run(&["trigger", "list", "--limit", "5", "--json"]);
    let request = &stdout_json(&output)["result"];
    assert!(request["url"]
        .as_str()
        .unwrap()
        .ends_with("/triggers?bestEffortLimit=5"));
}

#[test]
fn test_trigger_request_text_output() {
    let ws = Workspace::new();
    ws.write_complete_config();

    let output = ws.run(&["trigger", "get", "tr-1", "--no-json"]);
    assert!(output.status.success());
    let text = stdout_text(&output);
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("GET https://api-jp.kii.com/thing-if/apps/app-1/targets/thing:th.1/triggers/tr-1")
    );
    assert!(text.contains("X-Kii-AppID: app-1"));
}

#[test]
fn test_trigger_list_encodes_pagination_key() {
    let ws = Workspace::new();
    ws.write_complete_config();

    let output = ws.run(&[
        "trigger", "list", "--limit", "10", "--pagination-key", "a&bestEffortLimit=99#x", "--json",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr_text(&output));
    let url = stdout_json(&output)["result"]["url"].as_str().unwrap().to_string();
    assert!(url.ends_with("?bestEffortLimit=10&paginationKey=a%26bestEffortLimit%3D99%23x"));
}

#[test]
fn test_trigger_patch_title_only() {
    let ws = Workspace::new();
    ws.write_complete_config();

    let output = ws.run(&["trigger", "patch", "tr-1", "--title", "renamed", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr_text(&output));
    assert_eq!(stdout_json(&output)["result"]["body"], json!({ "title": "renamed" }));
}

#[test]
fn test_trigger_parse_response() {
    let ws = Workspace::new();
    let response = ws.write_json(
        "trigger.json",
        &json!({
            "triggerID": "tr-1",
            "disabled": true,
            "predicate": { "eventSource": "SCHEDULE", "schedule": "0 9 * * *" },
            "command": {
                "target": "thing:th.1",
                "issuer": "user:owner-1",
                "actions": [{ "turnPower": { "power": true } }]
            }
        }),
    );

    let output = ws.run(&["trigger", "parse", &response, "--target", "thing:th.1", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr_text(&output));
    let data = &stdout_json(&output)["result"];
    assert_eq!(data["trigger_id"], "tr-1");
    assert_eq!(data["enabled"], false);
    assert_eq!(data["actions"], 1);
    assert_eq!(data["predicate"], "SCHEDULE '0 9 * * *'");
}

#[test]
fn test_trigger_parse_list_fails_on_bad_entry() {
    let ws = Workspace::new();
    ws.write_complete_config();
    let response = ws.write_json(
        "list.json",
        &json!({
            "triggers": [
                { "triggerID": "a", "predicate": { "eventSource": "SCHEDULE", "schedule": "* * * * *" } },
                { "triggerID": "b", "predicate": { "eventSource": "STATES" } }
            ],
            "nextPaginationKey": "k"
        }),
    );

    let output = ws.run(&["trigger", "parse", &response, "--list", "--json"]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        stdout_json(&output)["error"]["data"]["path"],
        "triggers[1].predicate"
    );
}
