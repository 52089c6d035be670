//! Output capture for the Golite bridge.
//!
//! Evaluated code never writes to the real process stdout directly. It writes
//! through an [`OutputSink`], a single rebindable slot that normally points
//! at stdout. A [`Capture`] span swaps a pipe into that slot for the duration
//! of one evaluation and drains it on a background thread:
//!
//! ```text
//! begin:  install pipe writer -> spawn drain thread -> run evaluation
//! finish: restore original    -> writer dropped (EOF) -> join drain -> String
//! ```
//!
//! Restoration also happens in `Drop`, so a span that is unwound by a panic
//! still puts the original target back.

mod capture;
mod error;
mod pipe;
mod sink;

pub use capture::{Capture, DEFAULT_PIPE_CAPACITY};
pub use error::CaptureError;
pub use pipe::{pipe, PipeReader, PipeWriter};
pub use sink::{shared_stdout, OutputSink, SharedBuffer, SharedSink, Target};
