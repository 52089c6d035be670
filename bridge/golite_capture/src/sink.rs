//! The rebindable output sink.
//!
//! Uses enum dispatch for the target: the set of destinations is closed and
//! the write path runs for every `print` in evaluated code.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::CaptureError;
use crate::pipe::PipeWriter;

/// Where writes to an [`OutputSink`] currently go.
#[derive(Debug)]
pub enum Target {
    /// The real process stdout (default).
    Stdout,
    /// The real process stderr.
    Stderr,
    /// A shared in-memory buffer, readable through [`SharedBuffer`].
    Buffer(SharedBuffer),
    /// The write end of a capture pipe.
    Pipe(PipeWriter),
    /// Drop everything.
    Discard,
}

impl Target {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self {
            Target::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(bytes)?;
                out.flush()
            }
            Target::Stderr => io::stderr().lock().write_all(bytes),
            Target::Buffer(buf) => {
                buf.0.lock().extend_from_slice(bytes);
                Ok(())
            }
            Target::Pipe(writer) => writer.write_all(bytes),
            Target::Discard => Ok(()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Target::Stdout => "stdout",
            Target::Stderr => "stderr",
            Target::Buffer(_) => "buffer",
            Target::Pipe(_) => "pipe",
            Target::Discard => "discard",
        }
    }
}

/// Cloneable byte buffer usable as a [`Target`].
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, decoded lossily.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

/// A single output slot shared by the interpreter and the capture machinery.
#[derive(Debug)]
pub struct OutputSink {
    target: Mutex<Target>,
}

/// Handle passed to everything that writes program output.
pub type SharedSink = Arc<OutputSink>;

/// A sink bound to the real process stdout.
pub fn shared_stdout() -> SharedSink {
    Arc::new(OutputSink::new(Target::Stdout))
}

impl OutputSink {
    pub fn new(target: Target) -> Self {
        OutputSink {
            target: Mutex::new(target),
        }
    }

    /// Write raw bytes to the current target.
    pub fn write_all(&self, bytes: &[u8]) -> io::Result<()> {
        self.target.lock().write_all(bytes)
    }

    /// Write text to the current target.
    pub fn write_str(&self, text: &str) -> io::Result<()> {
        self.write_all(text.as_bytes())
    }

    /// Whether a capture pipe is currently installed.
    pub fn is_capturing(&self) -> bool {
        matches!(*self.target.lock(), Target::Pipe(_))
    }

    /// Name of the current target, for logging.
    pub fn target_kind(&self) -> &'static str {
        self.target.lock().kind()
    }

    /// Install `writer`, returning the target it displaced.
    ///
    /// Fails without touching the slot if a pipe is already installed.
    pub(crate) fn install_pipe(&self, writer: PipeWriter) -> Result<Target, CaptureError> {
        let mut slot = self.target.lock();
        if matches!(*slot, Target::Pipe(_)) {
            return Err(CaptureError::AlreadyActive);
        }
        Ok(std::mem::replace(&mut *slot, Target::Pipe(writer)))
    }

    /// Put `original` back, returning whatever was installed.
    pub(crate) fn restore(&self, original: Target) -> Target {
        std::mem::replace(&mut *self.target.lock(), original)
    }
}
