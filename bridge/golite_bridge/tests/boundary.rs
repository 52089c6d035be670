//! End-to-end behavior of the boundary calls.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::sync::Arc;

use golite_bridge::{Bridge, BridgeConfig};
use golite_capture::{OutputSink, SharedBuffer, Target};
use golite_interp::format::quote;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

fn bridge() -> (Bridge, SharedBuffer) {
    let original = SharedBuffer::new();
    let sink = Arc::new(OutputSink::new(Target::Buffer(original.clone())));
    (
        Bridge::with_sink(&BridgeConfig::default(), sink).unwrap(),
        original,
    )
}

#[test]
fn printed_literal_is_the_output() {
    let (bridge, _) = bridge();
    let response = bridge.eval_source(r#"import "fmt"; fmt.Print("Hello, bridge")"#);
    assert!(response.success);
    assert_eq!(response.output, "Hello, bridge");
    assert_eq!(response.error, None);
}

#[test]
fn fault_keeps_output_printed_before_it() {
    let (bridge, _) = bridge();
    let response = bridge.eval_source("print(\"start \")\nvar xs []int\nprint(xs[0])");
    assert!(!response.success);
    assert_eq!(response.output, "start ");
    assert_eq!(
        response.error.as_deref(),
        Some("panic: runtime error: index out of range [0] with length 0")
    );
}

#[test]
fn wrong_argument_count_never_evaluates() {
    let (bridge, _) = bridge();
    let response = bridge.eval(&[json!("counter := 1"), json!("counter := 2")]);
    assert_eq!(
        response.error.as_deref(),
        Some("eval requires exactly one argument (Go source code)")
    );
    assert!(!bridge.eval_source("print(counter)").success);
}

#[test]
fn bindings_persist_until_reset() {
    let (bridge, _) = bridge();
    bridge.eval_source(r#"import "strings""#);
    bridge.eval_source(
        "greeting := \"hi\"\nfunc shout(s string) string { return strings.ToUpper(s) + \"!\" }",
    );
    assert_eq!(bridge.eval_source("print(shout(greeting))").output, "HI!");

    assert!(bridge.reset().success);
    let after = bridge.eval_source("print(shout(greeting))");
    assert!(!after.success);
    assert_eq!(after.output, "");
}

#[test]
fn reset_always_succeeds_on_a_healthy_bridge() {
    let (bridge, _) = bridge();
    for _ in 0..3 {
        let reset = bridge.reset();
        assert!(reset.success);
        assert_eq!(reset.message, "Interpreter reset successfully");
    }
}

#[test]
fn original_sink_is_untouched_and_restored() {
    let (bridge, original) = bridge();
    bridge.eval_source("print(\"captured\")");
    bridge.eval_source("panic(\"boom\")");
    bridge.eval_source("print(");
    assert_eq!(original.contents(), "");
    assert!(!bridge.sink().is_capturing());

    bridge.sink().write_str("host line").unwrap();
    assert_eq!(original.contents(), "host line");
}

#[test]
fn output_does_not_accumulate() {
    let (bridge, _) = bridge();
    assert_eq!(bridge.eval_source("print(\"one\")").output, "one");
    assert_eq!(bridge.eval_source("print(\"two\")").output, "two");
    assert_eq!(bridge.eval_source("x := 3").output, "");
}

#[test]
fn syntax_error_is_a_plain_error() {
    let (bridge, _) = bridge();
    let response = bridge.eval_source("x := ");
    assert!(!response.success);
    let error = response.error.unwrap();
    assert!(!error.starts_with("panic: "), "{error}");
}

#[test]
fn large_output_is_captured_whole() {
    let (bridge, _) = bridge();
    let response = bridge.eval_source(
        r#"import "fmt"
for i := 0; i < 2000; i++ { fmt.Println("line", i) }"#,
    );
    assert!(response.success);
    assert_eq!(response.output.lines().count(), 2000);
    assert!(response.output.ends_with("line 1999\n"));
}

#[test]
fn oversized_inputs_return_a_result() {
    let (bridge, _) = bridge();
    let response =
        bridge.eval_source("for i := range 1099511627776 { if i == 2 { break } }\nprint(\"done\")");
    assert_eq!(response.output, "done");

    let response = bridge.eval_source(
        r#"import "fmt"
print(fmt.Sprintf("%10000000000000d|%99999999999999999999d", 1, 2))"#,
    );
    assert_eq!(response.error, None);
    assert_eq!(response.output, "%!(BADWIDTH)1|%!(BADWIDTH)2");
}

#[test]
fn eval_response_json_shape() {
    let (bridge, _) = bridge();
    let value = serde_json::to_value(bridge.eval(&[json!("print(1)")])).unwrap();
    assert_eq!(value, json!({"success": true, "output": "1", "error": null}));
    let value = serde_json::to_value(bridge.reset()).unwrap();
    assert_eq!(
        value,
        json!({"success": true, "message": "Interpreter reset successfully"})
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn printing_a_literal_outputs_it_exactly(text in "[ -~\t\n\u{1}-\u{1f}é✓]{0,40}") {
        let (bridge, original) = bridge();
        let source = format!("import \"fmt\"\nfmt.Print({})", quote(&text));
        let response = bridge.eval_source(&source);
        prop_assert!(response.success, "{:?}", response.error);
        prop_assert_eq!(response.output, text);
        prop_assert_eq!(original.contents(), "");
    }
}
