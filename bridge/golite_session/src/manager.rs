//! Ownership of the single live session.

use std::sync::Arc;

use golite_capture::SharedSink;
use parking_lot::{Mutex, MutexGuard};

use crate::error::SessionError;
use crate::executor::{EvaluationResult, Executor};
use crate::session::SessionFactory;

/// Message of a successful reset.
pub const RESET_MESSAGE: &str = "Interpreter reset successfully";

/// Outcome of a `reset` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResetOutcome {
    success: bool,
    message: String,
}

impl ResetOutcome {
    fn new(success: bool, message: impl Into<String>) -> Self {
        ResetOutcome {
            success,
            message: message.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Owns the current [`Executor`] and replaces it on reset.
///
/// Calls never wait for each other: a call that finds the session held by
/// another call is rejected with [`SessionError::Busy`]. This also keeps the
/// output sink's single capture slot from ever being contended.
pub struct SessionManager<F: SessionFactory> {
    factory: F,
    sink: SharedSink,
    capture_capacity: usize,
    executor: Mutex<Executor<F::Session>>,
}

impl<F: SessionFactory> SessionManager<F> {
    /// Build the first session. Failure here is fatal to the caller.
    pub fn new(
        factory: F,
        sink: SharedSink,
        capture_capacity: usize,
    ) -> Result<Self, SessionError> {
        let session = factory.create(&sink)?;
        let executor = Executor::new(session, Arc::clone(&sink), capture_capacity);
        tracing::info!(capture_capacity, "session initialized");
        Ok(SessionManager {
            factory,
            sink,
            capture_capacity,
            executor: Mutex::new(executor),
        })
    }

    /// The active session's executor, held exclusively until the guard drops.
    pub fn current(&self) -> Result<MutexGuard<'_, Executor<F::Session>>, SessionError> {
        self.executor.try_lock().ok_or(SessionError::Busy)
    }

    pub fn eval<A: AsRef<str>>(&self, args: &[A]) -> EvaluationResult {
        match self.current() {
            Ok(mut executor) => executor.evaluate(args),
            Err(err) => {
                tracing::warn!("eval rejected: {err}");
                EvaluationResult::failed(String::new(), err.to_string())
            }
        }
    }

    /// Replace the session with a fresh one.
    ///
    /// The new session is fully built before it becomes visible. If building
    /// it fails, the old session stays active.
    pub fn reset(&self) -> ResetOutcome {
        let mut executor = match self.current() {
            Ok(executor) => executor,
            Err(err) => {
                tracing::warn!("reset rejected: {err}");
                return ResetOutcome::new(false, err.to_string());
            }
        };
        match self.factory.create(&self.sink) {
            Ok(session) => {
                *executor = Executor::new(session, Arc::clone(&self.sink), self.capture_capacity);
                tracing::info!("session reset");
                ResetOutcome::new(true, RESET_MESSAGE)
            }
            Err(err) => {
                tracing::error!(%err, "reset failed, keeping previous session");
                ResetOutcome::new(false, format!("reset failed: {err}"))
            }
        }
    }

    pub fn sink(&self) -> &SharedSink {
        &self.sink
    }
}

#[cfg(test)]
mod tests;
