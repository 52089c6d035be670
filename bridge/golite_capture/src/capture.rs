//! Capture spans.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::CaptureError;
use crate::pipe::pipe;
use crate::sink::{SharedSink, Target};

/// Default number of unread chunks a capture pipe holds before writers block.
pub const DEFAULT_PIPE_CAPACITY: usize = 64;

/// One active redirection of an [`OutputSink`](crate::OutputSink) into memory.
///
/// Created by [`Capture::begin`], consumed by [`Capture::finish`]. If the span
/// is dropped without finishing (for example during unwinding), the original
/// target is restored and the drain thread is joined anyway.
#[derive(Debug)]
pub struct Capture {
    sink: SharedSink,
    original: Option<Target>,
    drain: Option<JoinHandle<io::Result<Vec<u8>>>>,
}

impl Capture {
    /// Redirect `sink` into a fresh pipe and start draining it.
    ///
    /// The pipe is installed and the drain thread is running before this
    /// returns, so the caller may hand control to code that writes.
    #[tracing::instrument(level = "trace", skip(sink))]
    pub fn begin(sink: &SharedSink, capacity: usize) -> Result<Capture, CaptureError> {
        let (writer, mut reader) = pipe(capacity);
        let original = sink.install_pipe(writer)?;

        let spawned = thread::Builder::new()
            .name("golite-capture-drain".into())
            .spawn(move || -> io::Result<Vec<u8>> {
                let mut buffer = Vec::new();
                io::copy(&mut reader, &mut buffer)?;
                Ok(buffer)
            });

        match spawned {
            Ok(handle) => Ok(Capture {
                sink: Arc::clone(sink),
                original: Some(original),
                drain: Some(handle),
            }),
            Err(err) => {
                // Drops the pipe writer along with the displaced slot.
                drop(sink.restore(original));
                Err(CaptureError::Spawn(err))
            }
        }
    }

    /// Restore the original target and return everything written meanwhile.
    pub fn finish(mut self) -> Result<String, CaptureError> {
        let bytes = self.close()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn close(&mut self) -> Result<Vec<u8>, CaptureError> {
        if let Some(original) = self.original.take() {
            // Dropping the displaced pipe writer is the end-of-stream signal.
            drop(self.sink.restore(original));
        }
        let Some(handle) = self.drain.take() else {
            return Ok(Vec::new());
        };
        match handle.join() {
            Ok(Ok(bytes)) => {
                tracing::trace!(bytes = bytes.len(), "capture drained");
                Ok(bytes)
            }
            Ok(Err(err)) => Err(CaptureError::Drain(err)),
            Err(_) => Err(CaptureError::DrainPanicked),
        }
    }
}

impl Drop for Capture {
    fn drop(&mut self) {
        if self.original.is_some() || self.drain.is_some() {
            if let Err(err) = self.close() {
                tracing::warn!(error = %err, "capture closed during unwind");
            }
        }
    }
}
