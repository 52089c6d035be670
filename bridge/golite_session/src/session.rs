//! The interpreter seam.

use std::fmt;
use std::sync::Arc;

use golite_capture::SharedSink;
use golite_interp::{stdlib, EvalError, InterpOptions, Interpreter, Value};

use crate::error::SessionError;

/// Anything that can evaluate source text against accumulated state.
///
/// Ordinary failures are returned as `Err`. Faults unwind and are caught by
/// the [`Executor`](crate::Executor).
pub trait Evaluate {
    type Value: fmt::Debug;
    type Error: fmt::Display;

    fn evaluate(&mut self, source: &str) -> Result<Self::Value, Self::Error>;
}

/// Builds fresh sessions bound to the shared output sink.
pub trait SessionFactory {
    type Session: Evaluate;

    fn create(&self, sink: &SharedSink) -> Result<Self::Session, SessionError>;
}

impl Evaluate for Interpreter {
    type Value = Value;
    type Error = EvalError;

    fn evaluate(&mut self, source: &str) -> Result<Value, EvalError> {
        Interpreter::evaluate(self, source)
    }
}

/// Golite interpreter with the baseline library installed.
#[derive(Clone, Copy, Debug, Default)]
pub struct GoliteFactory {
    pub options: InterpOptions,
}

impl GoliteFactory {
    pub fn new(options: InterpOptions) -> Self {
        GoliteFactory { options }
    }
}

impl SessionFactory for GoliteFactory {
    type Session = Interpreter;

    fn create(&self, sink: &SharedSink) -> Result<Interpreter, SessionError> {
        let mut interpreter = Interpreter::new(Arc::clone(sink), self.options)?;
        interpreter.use_symbols(stdlib::symbols())?;
        Ok(interpreter)
    }
}
