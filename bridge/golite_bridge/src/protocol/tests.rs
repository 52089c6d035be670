#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::api::VERSION;
use crate::config::BridgeConfig;
use golite_capture::{OutputSink, Target};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn bridge() -> Bridge {
    let sink = Arc::new(OutputSink::new(Target::Discard));
    Bridge::with_sink(&BridgeConfig::default(), sink).unwrap()
}

fn call(bridge: &Bridge, line: &str) -> Value {
    serde_json::to_value(handle_line(bridge, line)).unwrap()
}

#[test]
fn eval_request() {
    let bridge = bridge();
    assert_eq!(
        call(&bridge, r#"{"id": 7, "call": "eval", "args": ["print(\"a\")"]}"#),
        json!({"id": 7, "result": {"success": true, "output": "a", "error": null}})
    );
}

#[test]
fn version_and_reset_requests() {
    let bridge = bridge();
    assert_eq!(
        call(&bridge, r#"{"id": "v", "call": "version"}"#),
        json!({"id": "v", "result": VERSION})
    );
    assert_eq!(
        call(&bridge, r#"{"call": "reset"}"#),
        json!({
            "id": null,
            "result": {"success": true, "message": "Interpreter reset successfully"}
        })
    );
}

#[test]
fn unknown_call_is_an_error_response() {
    let bridge = bridge();
    assert_eq!(
        call(&bridge, r#"{"id": 1, "call": "launch"}"#),
        json!({"id": 1, "error": "unknown call `launch` (expected eval, version or reset)"})
    );
}

#[test]
fn malformed_line_is_an_error_response() {
    let bridge = bridge();
    let response = handle_line(&bridge, "{not json");
    assert_eq!(response.id, Value::Null);
    assert!(response.result.is_none());
    assert!(response.error.unwrap().starts_with("malformed request: "));
}

#[test]
fn serve_answers_each_line_in_order() {
    let bridge = bridge();
    let input = concat!(
        "{\"id\": 1, \"call\": \"eval\", \"args\": [\"n := 2\"]}\n",
        "\n",
        "{\"id\": 2, \"call\": \"eval\", \"args\": [\"print(n * 21)\"]}\n",
        "{\"id\": 3, \"call\": \"eval\", \"args\": []}\n",
    );
    let mut out = Vec::new();
    serve(&bridge, input.as_bytes(), &mut out).unwrap();

    let lines: Vec<Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1]["result"]["output"], json!("42"));
    assert_eq!(
        lines[2]["result"]["error"],
        json!("eval requires exactly one argument (Go source code)")
    );
}
