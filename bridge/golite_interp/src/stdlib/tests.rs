#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::ast::Pos;
use golite_capture::{OutputSink, SharedBuffer, Target};
use pretty_assertions::assert_eq;

fn lookup(path: &str, name: &str) -> NativeFunc {
    symbols()
        .into_iter()
        .find(|package| package.path == path)
        .and_then(|package| package.member(name))
        .unwrap()
}

fn call(path: &str, name: &str, args: Vec<Value>) -> (EvalResult<Value>, String) {
    let func = lookup(path, name);
    let buf = SharedBuffer::new();
    let sink = OutputSink::new(Target::Buffer(buf.clone()));
    let result = (func.func)(&NativeCall::new(func.name, Pos::new(1, 1), &sink), args);
    (result, buf.contents())
}

fn strs(items: &[&str]) -> Value {
    Value::list(items.iter().map(|s| Value::str(*s)).collect())
}

#[test]
fn packages_list_their_members() {
    let fmt = symbols().into_iter().find(|p| p.path == "fmt").unwrap();
    let members: Vec<&str> = fmt.members().collect();
    assert!(members.contains(&"fmt.Println"));
    assert!(fmt.member("Nope").is_none());
}

#[test]
fn member_lookup_requires_exact_name() {
    let strings = symbols().into_iter().find(|p| p.path == "strings").unwrap();
    assert!(strings.member("Join").is_some());
    assert!(strings.member("Joi").is_none());
}

#[test]
fn fmt_println_writes_to_sink() {
    let (result, out) = call("fmt", "Println", vec![Value::str("Hello"), Value::Int(42)]);
    assert_eq!(result.unwrap(), Value::Nil);
    assert_eq!(out, "Hello 42\n");
}

#[test]
fn fmt_printf_formats() {
    let (_, out) = call(
        "fmt",
        "Printf",
        vec![Value::str("%d-%s\n"), Value::Int(1), Value::str("a")],
    );
    assert_eq!(out, "1-a\n");
}

#[test]
fn fmt_sprintf_returns_string() {
    let (result, out) = call("fmt", "Sprintf", vec![Value::str("<%v>"), Value::Int(3)]);
    assert_eq!(result.unwrap(), Value::str("<3>"));
    assert_eq!(out, "");
}

#[test]
fn strings_case_and_repeat() {
    assert_eq!(call("strings", "ToUpper", vec![Value::str("go")]).0.unwrap(), Value::str("GO"));
    assert_eq!(call("strings", "ToLower", vec![Value::str("GO")]).0.unwrap(), Value::str("go"));
    assert_eq!(
        call("strings", "Repeat", vec![Value::str("ab"), Value::Int(3)]).0.unwrap(),
        Value::str("ababab")
    );
}

#[test]
fn strings_split_and_join() {
    let parts = call("strings", "Split", vec![Value::str("a,b,c"), Value::str(",")]).0.unwrap();
    assert_eq!(parts, strs(&["a", "b", "c"]));
    let joined = call("strings", "Join", vec![parts, Value::str("-")]).0.unwrap();
    assert_eq!(joined, Value::str("a-b-c"));
}

#[test]
fn strings_split_on_empty_separator_yields_chars() {
    let parts = call("strings", "Split", vec![Value::str("héj"), Value::str("")]).0.unwrap();
    assert_eq!(parts, strs(&["h", "é", "j"]));
}

#[test]
fn strings_predicates_and_trim() {
    let contains = call("strings", "Contains", vec![Value::str("golite"), Value::str("lit")]);
    assert_eq!(contains.0.unwrap(), Value::Bool(true));
    let prefix = call("strings", "HasPrefix", vec![Value::str("golite"), Value::str("lite")]);
    assert_eq!(prefix.0.unwrap(), Value::Bool(false));
    let trimmed = call("strings", "TrimSpace", vec![Value::str("  x \n")]);
    assert_eq!(trimmed.0.unwrap(), Value::str("x"));
}

#[test]
fn strings_functions_check_argument_types() {
    let (result, _) = call("strings", "ToUpper", vec![Value::Int(1)]);
    assert_eq!(
        result.unwrap_err().to_string(),
        "1:1: cannot use value of type int as string value in argument to strings.ToUpper"
    );
}

#[test]
fn strconv_itoa_and_quote() {
    assert_eq!(call("strconv", "Itoa", vec![Value::Int(-5)]).0.unwrap(), Value::str("-5"));
    assert_eq!(
        call("strconv", "Quote", vec![Value::str("a\"b")]).0.unwrap(),
        Value::str("\"a\\\"b\"")
    );
}
