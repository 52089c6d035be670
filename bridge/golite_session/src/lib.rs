//! Evaluation executor and session manager for the Golite bridge.
//!
//! ```text
//! SessionManager ── try_lock ──> Executor ── Capture::begin
//!                                   │          isolate(session.evaluate)
//!                                   │        Capture::finish
//!                                   └──> EvaluationResult
//! ```
//!
//! No fault raised while evaluating ever escapes [`Executor::evaluate`], and
//! the output sink is restored on every path out of it.

mod error;
mod executor;
mod isolate;
mod manager;
mod session;

pub use error::SessionError;
pub use executor::{EvaluationResult, Executor, ARGUMENT_ERROR, FAULT_PREFIX};
pub use isolate::{describe_payload, isolate};
pub use manager::{ResetOutcome, SessionManager, RESET_MESSAGE};
pub use session::{Evaluate, GoliteFactory, SessionFactory};
