#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use golite_capture::{SharedBuffer, Target};
use pretty_assertions::assert_eq;
use std::panic::{self, AssertUnwindSafe};

fn call_builtin(name: &str, args: Vec<Value>) -> (EvalResult<Value>, String) {
    let buf = SharedBuffer::new();
    let sink = OutputSink::new(Target::Buffer(buf.clone()));
    let builtin = universe(name).unwrap();
    let call = NativeCall::new(builtin.name, Pos::new(1, 1), &sink);
    let result = (builtin.func)(&call, args);
    (result, buf.contents())
}

#[test]
fn universe_lookup() {
    assert!(universe("len").is_some());
    assert!(universe("Println").is_none());
}

#[test]
fn print_concatenates_without_separators() {
    let (result, out) = call_builtin("print", vec![Value::str("a"), Value::Int(1), Value::Int(2)]);
    assert_eq!(result.unwrap(), Value::Nil);
    assert_eq!(out, "a12");
}

#[test]
fn println_separates_with_spaces() {
    let (_, out) = call_builtin("println", vec![Value::str("a"), Value::Int(1)]);
    assert_eq!(out, "a 1\n");
}

#[test]
fn len_of_string_counts_bytes() {
    let (result, _) = call_builtin("len", vec![Value::str("héllo")]);
    assert_eq!(result.unwrap(), Value::Int(6));
}

#[test]
fn len_rejects_ints() {
    let (result, _) = call_builtin("len", vec![Value::Int(3)]);
    assert_eq!(
        result.unwrap_err().to_string(),
        "1:1: invalid operation: invalid argument: 3 (type int) for len"
    );
}

#[test]
fn append_extends_without_touching_the_original() {
    let original = Value::list(vec![Value::Int(1)]);
    let (result, _) = call_builtin("append", vec![original.clone(), Value::Int(2)]);
    assert_eq!(
        result.unwrap(),
        Value::list(vec![Value::Int(1), Value::Int(2)])
    );
    assert_eq!(original, Value::list(vec![Value::Int(1)]));
}

#[test]
fn append_to_nil_starts_a_list() {
    let (result, _) = call_builtin("append", vec![Value::Nil, Value::str("x")]);
    assert_eq!(result.unwrap(), Value::list(vec![Value::str("x")]));
}

#[test]
fn wrong_arity_is_an_error() {
    let (result, _) = call_builtin("len", vec![]);
    assert_eq!(
        result.unwrap_err().kind,
        EvalErrorKind::ArgumentCount {
            name: "len".to_string(),
            expected: 1,
            got: 0,
        }
    );
}

#[test]
fn panic_unwinds_with_fault_payload() {
    let caught = panic::catch_unwind(AssertUnwindSafe(|| {
        call_builtin("panic", vec![Value::str("boom")])
    }));
    let payload = caught.unwrap_err();
    let fault = payload.downcast_ref::<Fault>().unwrap();
    assert_eq!(fault.description(), "boom");
}
