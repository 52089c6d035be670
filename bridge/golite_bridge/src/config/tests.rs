#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use pretty_assertions::assert_eq;

fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |name| {
        vars.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| (*value).to_string())
    }
}

#[test]
fn defaults_without_overrides() {
    assert_eq!(
        BridgeConfig::from_lookup(lookup(&[])).unwrap(),
        BridgeConfig::default()
    );
}

#[test]
fn overrides_are_applied() {
    let config = BridgeConfig::from_lookup(lookup(&[
        ("GOLITE_MAX_CALL_DEPTH", "200"),
        ("GOLITE_CAPTURE_CAPACITY", " 8 "),
    ]))
    .unwrap();
    assert_eq!(
        config,
        BridgeConfig {
            max_call_depth: 200,
            capture_capacity: 8,
        }
    );
}

#[test]
fn zero_and_garbage_are_rejected() {
    let err = BridgeConfig::from_lookup(lookup(&[("GOLITE_MAX_CALL_DEPTH", "0")])).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid GOLITE_MAX_CALL_DEPTH=\"0\": expected a positive integer"
    );
    assert!(BridgeConfig::from_lookup(lookup(&[("GOLITE_CAPTURE_CAPACITY", "lots")])).is_err());
}
