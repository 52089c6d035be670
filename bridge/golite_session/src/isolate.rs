//! Fault isolation.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use golite_interp::Fault;

/// Run `f`, turning an unwinding panic into a [`Fault`].
///
/// The caller is responsible for leaving shared state consistent after a
/// fault; the interpreter does this with scope guards and by resetting its
/// frames at the start of every evaluation.
pub fn isolate<T>(f: impl FnOnce() -> T) -> Result<T, Fault> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(describe_payload)
}

/// Extract a description from a panic payload.
pub fn describe_payload(payload: Box<dyn Any + Send>) -> Fault {
    let payload = match payload.downcast::<Fault>() {
        Ok(fault) => return *fault,
        Err(other) => other,
    };
    if let Some(message) = payload.downcast_ref::<&str>() {
        Fault::new(*message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        Fault::new(message.clone())
    } else {
        Fault::new("unknown fault")
    }
}
