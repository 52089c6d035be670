#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::session::GoliteFactory;
use golite_capture::{OutputSink, SharedBuffer, Target, DEFAULT_PIPE_CAPACITY};
use golite_interp::{InitError, InterpOptions, Interpreter};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};

fn buffered_sink() -> SharedSink {
    Arc::new(OutputSink::new(Target::Buffer(SharedBuffer::new())))
}

fn manager() -> SessionManager<GoliteFactory> {
    SessionManager::new(GoliteFactory::default(), buffered_sink(), DEFAULT_PIPE_CAPACITY).unwrap()
}

/// Succeeds for the first `healthy` builds, then fails.
struct Flaky {
    healthy: usize,
    built: AtomicUsize,
}

impl SessionFactory for Flaky {
    type Session = Interpreter;

    fn create(&self, sink: &SharedSink) -> Result<Interpreter, SessionError> {
        if self.built.fetch_add(1, Ordering::SeqCst) >= self.healthy {
            return Err(SessionError::Init(InitError::ZeroCallDepth));
        }
        GoliteFactory::default().create(sink)
    }
}

#[test]
fn bindings_persist_until_reset() {
    let manager = manager();
    assert!(manager.eval(&["x := 41"]).success());
    assert_eq!(manager.eval(&["print(x + 1)"]).output(), "42");

    let outcome = manager.reset();
    assert!(outcome.success());
    assert_eq!(outcome.message(), RESET_MESSAGE);

    let result = manager.eval(&["print(x)"]);
    assert!(!result.success());
    assert_eq!(result.error(), Some("1:7: undefined: x"));
}

#[test]
fn session_accepts_calls_after_reset() {
    let manager = manager();
    manager.reset();
    manager.reset();
    assert_eq!(manager.eval(&["print(\"ok\")"]).output(), "ok");
}

#[test]
fn startup_failure_is_returned() {
    let factory = Flaky {
        healthy: 0,
        built: AtomicUsize::new(0),
    };
    let err = SessionManager::new(factory, buffered_sink(), DEFAULT_PIPE_CAPACITY)
        .err()
        .unwrap();
    assert!(matches!(err, SessionError::Init(InitError::ZeroCallDepth)));
}

#[test]
fn failed_reset_keeps_previous_session() {
    let factory = Flaky {
        healthy: 1,
        built: AtomicUsize::new(0),
    };
    let manager = SessionManager::new(factory, buffered_sink(), DEFAULT_PIPE_CAPACITY).unwrap();
    manager.eval(&["kept := 5"]);

    let outcome = manager.reset();
    assert!(!outcome.success());
    assert_eq!(
        outcome.message(),
        "reset failed: failed to initialize interpreter: max call depth must be at least 1"
    );
    assert_eq!(manager.eval(&["print(kept)"]).output(), "5");
}

#[test]
fn overlapping_calls_are_rejected() {
    let manager = manager();
    let held = manager.current().unwrap();

    let result = manager.eval(&["print(1)"]);
    assert_eq!(result.error(), Some("busy: another evaluation is in progress"));
    assert!(!manager.reset().success());
    assert!(matches!(manager.current(), Err(SessionError::Busy)));

    drop(held);
    assert!(manager.eval(&["print(1)"]).success());
}

#[test]
fn golite_factory_honours_options() {
    let factory = GoliteFactory::new(InterpOptions { max_call_depth: 3 });
    let manager = SessionManager::new(factory, buffered_sink(), DEFAULT_PIPE_CAPACITY).unwrap();
    manager.eval(&["func f(n int) int { return f(n + 1) }"]);
    let result = manager.eval(&["f(0)"]);
    assert_eq!(
        result.error(),
        Some("panic: runtime error: stack exceeds 3 nested calls")
    );
    assert!(!manager.sink().is_capturing());
}
