//! One evaluation, start to finish.

use golite_capture::{Capture, SharedSink};

use crate::isolate::isolate;
use crate::session::Evaluate;

/// Returned when `eval` is not given exactly one source argument.
pub const ARGUMENT_ERROR: &str = "eval requires exactly one argument (Go source code)";

/// Prefix of every recovered fault message.
pub const FAULT_PREFIX: &str = "panic: ";

/// Outcome of one `eval` call. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvaluationResult {
    success: bool,
    output: String,
    error: Option<String>,
}

impl EvaluationResult {
    pub fn succeeded(output: String) -> Self {
        EvaluationResult {
            success: true,
            output,
            error: None,
        }
    }

    pub fn failed(output: String, error: impl Into<String>) -> Self {
        EvaluationResult {
            success: false,
            output,
            error: Some(error.into()),
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// Everything the evaluation printed, including before a failure.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn into_parts(self) -> (bool, String, Option<String>) {
        (self.success, self.output, self.error)
    }
}

/// Runs requests against one session inside a capture span.
#[derive(Debug)]
pub struct Executor<S> {
    session: S,
    sink: SharedSink,
    capture_capacity: usize,
}

impl<S: Evaluate> Executor<S> {
    pub fn new(session: S, sink: SharedSink, capture_capacity: usize) -> Self {
        Executor {
            session,
            sink,
            capture_capacity,
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Validate the argument list, then evaluate its single source text.
    pub fn evaluate<A: AsRef<str>>(&mut self, args: &[A]) -> EvaluationResult {
        let [source] = args else {
            tracing::debug!(count = args.len(), "rejected eval arguments");
            return EvaluationResult::failed(String::new(), ARGUMENT_ERROR);
        };
        self.evaluate_source(source.as_ref())
    }

    /// Evaluate `source` with its output captured and faults recovered.
    ///
    /// The capture span closes before the result is built, whether the
    /// session returned normally, returned an error or faulted.
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
    pub fn evaluate_source(&mut self, source: &str) -> EvaluationResult {
        let capture = match Capture::begin(&self.sink, self.capture_capacity) {
            Ok(capture) => capture,
            Err(err) => {
                tracing::error!(%err, "could not start output capture");
                return EvaluationResult::failed(
                    String::new(),
                    format!("output capture failed: {err}"),
                );
            }
        };

        let session = &mut self.session;
        let error = match isolate(|| session.evaluate(source)) {
            Ok(Ok(value)) => {
                tracing::debug!(?value, "evaluation succeeded");
                None
            }
            Ok(Err(err)) => {
                tracing::debug!(%err, "evaluation failed");
                Some(err.to_string())
            }
            Err(fault) => {
                tracing::warn!(%fault, "recovered fault");
                Some(format!("{FAULT_PREFIX}{fault}"))
            }
        };

        match (capture.finish(), error) {
            (Ok(output), None) => EvaluationResult::succeeded(output),
            (Ok(output), Some(error)) => EvaluationResult::failed(output, error),
            (Err(err), error) => {
                tracing::error!(%err, "could not finish output capture");
                let error = error.unwrap_or_else(|| format!("output capture failed: {err}"));
                EvaluationResult::failed(String::new(), error)
            }
        }
    }
}

#[cfg(test)]
mod tests;
