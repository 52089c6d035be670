#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use golite_capture::{OutputSink, SharedBuffer, Target, DEFAULT_PIPE_CAPACITY};
use golite_interp::Fault;
use pretty_assertions::assert_eq;
use std::sync::Arc;

/// Tiny command language: `print <text>`, `fail <msg>`, `fault <msg>`,
/// separated by `;`.
struct Scripted {
    sink: SharedSink,
    calls: usize,
}

impl Evaluate for Scripted {
    type Value = usize;
    type Error = String;

    fn evaluate(&mut self, source: &str) -> Result<usize, String> {
        self.calls += 1;
        for command in source.split(';') {
            match command.split_once(' ') {
                Some(("print", text)) => self.sink.write_str(text).unwrap(),
                Some(("fail", msg)) => return Err(msg.to_string()),
                Some(("fault", msg)) => Fault::raise(msg),
                _ => return Err(format!("bad command {command:?}")),
            }
        }
        Ok(self.calls)
    }
}

fn executor() -> (Executor<Scripted>, SharedBuffer) {
    let original = SharedBuffer::new();
    let sink = Arc::new(OutputSink::new(Target::Buffer(original.clone())));
    let session = Scripted {
        sink: Arc::clone(&sink),
        calls: 0,
    };
    (Executor::new(session, sink, DEFAULT_PIPE_CAPACITY), original)
}

#[test]
fn success_returns_captured_output() {
    let (mut exec, original) = executor();
    let result = exec.evaluate(&["print hello"]);
    assert_eq!(result, EvaluationResult::succeeded("hello".to_string()));
    assert_eq!(original.contents(), "");
}

#[test]
fn argument_count_is_checked_before_evaluating() {
    let (mut exec, _) = executor();
    let none: [&str; 0] = [];
    for result in [exec.evaluate(&none), exec.evaluate(&["print a", "print b"])] {
        assert!(!result.success());
        assert_eq!(result.output(), "");
        assert_eq!(result.error(), Some(ARGUMENT_ERROR));
    }
    assert_eq!(exec.session().calls, 0);
    assert!(!exec.sink.is_capturing());
}

#[test]
fn normal_error_keeps_partial_output() {
    let (mut exec, _) = executor();
    let result = exec.evaluate(&["print before;fail nope"]);
    assert_eq!(
        result,
        EvaluationResult::failed("before".to_string(), "nope")
    );
}

#[test]
fn fault_is_prefixed_and_keeps_partial_output() {
    let (mut exec, original) = executor();
    let result = exec.evaluate(&["print partial;fault index out of range"]);
    assert_eq!(result.output(), "partial");
    assert_eq!(result.error(), Some("panic: index out of range"));
    assert!(!exec.sink.is_capturing());

    exec.sink.write_str("after").unwrap();
    assert_eq!(original.contents(), "after");
}

#[test]
fn outputs_do_not_accumulate() {
    let (mut exec, _) = executor();
    assert_eq!(exec.evaluate(&["print 1"]).output(), "1");
    assert_eq!(exec.evaluate(&["print 2"]).output(), "2");
}

#[test]
fn capture_already_active_is_a_failed_result() {
    let (mut exec, _) = executor();
    let outer = Capture::begin(&exec.sink, DEFAULT_PIPE_CAPACITY).unwrap();

    let result = exec.evaluate(&["print x"]);
    assert!(!result.success());
    assert_eq!(
        result.error(),
        Some("output capture failed: output capture is already active")
    );
    assert_eq!(exec.session().calls, 0);

    assert_eq!(outer.finish().unwrap(), "");
}

#[test]
fn into_parts_exposes_all_fields() {
    let parts = EvaluationResult::failed("o".to_string(), "e").into_parts();
    assert_eq!(parts, (false, "o".to_string(), Some("e".to_string())));
}
