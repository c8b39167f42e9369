// integration tests for the check and fmt commands

use crate::common::*;
use serde_json::json;

fn nested_clause() -> serde_json::Value {
    json!({ "and": [
        { "type": "eq", "field": "power", "value": true },
        { "or": [
            { "type": "range", "field": "brightness", "lowerLimit": 50, "lowerLimitIncluded": false },
            { "type": "not", "clause": { "type": "eq", "field": "mode", "value": "eco" } }
        ]}
    ]})
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_clause_json() {
    let ws = Workspace::new();
    let input = ws.write_json("clause.json", &nested_clause());

    let output = ws.run(&["check", &input, "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr_text(&output));

    let json = stdout_json(&output);
    assert_eq!(json["jsonrpc"], "2.0");
    assert_eq!(json["result"]["kind"], "clause");
    assert_eq!(json["result"]["leaves"], 3);
}

#[test]
fn test_check_predicate_text() {
    let ws = Workspace::new();
    let input = ws.write_json(
        "predicate.json",
        &json!({
            "eventSource": "STATES",
            "triggersWhen": "CONDITION_CHANGED",
            "condition": nested_clause()
        }),
    );

    let output = ws.run(&["check", &input, "--no-json"]);
    assert!(output.status.success());
    let stdout = stdout_text(&output);
    assert!(stdout.contains("✓ valid predicate"), "stdout: {}", stdout);
    assert!(stdout.contains("CONDITION_CHANGED"));
}

#[test]
fn test_check_reports_error_path() {
    let ws = Workspace::new();
    let input = ws.write_json(
        "predicate.json",
        &json!({
            "eventSource": "STATES",
            "triggersWhen": "CONDITION_TRUE",
            "condition": { "and": [
                { "type": "eq", "field": "a", "value": 1 },
                { "type": "bogus" }
            ]}
        }),
    );

    let output = ws.run(&["check", &input, "--json"]);
    assert_eq!(output.status.code(), Some(2));

    let json = stdout_json(&output);
    assert_eq!(json["error"]["code"], -32002);
    assert_eq!(json["error"]["data"]["path"], "condition.and[1].type");
}

#[test]
fn test_check_text_error_goes_to_stderr() {
    let ws = Workspace::new();
    let input = ws.write_json("clause.json", &json!({ "or": [{ "type": "eq", "field": "a", "value": 1 }] }));

    let output = ws.run(&["check", &input, "--no-json"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout_text(&output).is_empty());
    let stderr = stderr_text(&output);
    assert!(stderr.starts_with("error: or:"), "stderr: {}", stderr);
}

#[test]
fn test_check_invalid_json_is_malformed() {
    let ws = Workspace::new();
    let input = ws.write_raw("broken.json", "{ \"type\": ");

    let output = ws.run(&["check", &input]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_check_missing_file_is_general_error() {
    let ws = Workspace::new();
    let missing = ws.dir.path().join("nope.json");

    let output = ws.run(&["check", missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_check_schedule_validation_is_opt_in() {
    let ws = Workspace::new();
    let input = ws.write_json(
        "schedule.json",
        &json!({ "eventSource": "SCHEDULE", "schedule": "61 * * * *" }),
    );

    let output = ws.run(&["check", &input]);
    assert!(output.status.success());

    let output = ws.run(&["check", &input, "--schedule", "--json"]);
    assert_eq!(output.status.code(), Some(2));
    let json = stdout_json(&output);
    assert_eq!(json["error"]["data"]["path"], "schedule");
}

#[test]
fn test_check_reads_stdin() {
    let ws = Workspace::new();
    let output = run_thingif_with_stdin(
        &["check", "-", "--json"],
        &ws.config_path(),
        r#"{"type": "eq", "field": "color", "value": 0}"#,
    );
    assert!(output.status.success(), "stderr: {}", stderr_text(&output));
    assert_eq!(stdout_json(&output)["result"]["summary"], "color == 0");
}

#[test]
fn test_unknown_flag_is_invalid_args() {
    let ws = Workspace::new();
    let output = ws.run(&["check", "x.json", "--frobnicate"]);
    assert_eq!(output.status.code(), Some(4));
}

// ============================================================================
// fmt
// ============================================================================

#[test]
fn test_fmt_canonicalizes_aliases() {
    let ws = Workspace::new();
    let input = ws.write_json(
        "clause.json",
        &json!({
            "type": "or",
            "clauses": [
                { "type": "eq", "field": "a", "value": 1 },
                { "type": "range", "field": "b", "upperLimit": 2.5, "upperIncluded": false }
            ]
        }),
    );

    let output = ws.run(&["fmt", &input, "--no-json", "--compact"]);
    assert!(output.status.success());

    let printed: serde_json::Value = serde_json::from_str(stdout_text(&output).trim()).unwrap();
    assert_eq!(
        printed,
        json!({ "or": [
            { "type": "eq", "field": "a", "value": 1 },
            { "type": "range", "field": "b", "upperLimit": 2.5, "upperLimitIncluded": false }
        ]})
    );
}

#[test]
fn test_fmt_json_wraps_canonical_form() {
    let ws = Workspace::new();
    let input = ws.write_json(
        "predicate.json",
        &json!({ "eventSource": "SCHEDULE_ONCE", "scheduleAt": 1893553445000i64 }),
    );

    let output = ws.run(&["fmt", &input, "--json"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output)["result"],
        json!({ "eventSource": "SCHEDULE_ONCE", "scheduleAt": 1893553445000i64 })
    );
}

#[test]
fn test_quiet_prints_nothing() {
    let ws = Workspace::new();
    let input = ws.write_json("clause.json", &nested_clause());

    let output = ws.run(&["fmt", &input, "--quiet"]);
    assert!(output.status.success());
    assert!(stdout_text(&output).is_empty());
}
