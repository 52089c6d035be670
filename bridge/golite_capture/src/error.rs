use std::io;

/// Failure to start or finish a capture span.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// A pipe is already installed in the sink. Only one span may be active.
    #[error("output capture is already active")]
    AlreadyActive,
    /// The drain thread could not be started.
    #[error("failed to start output drain thread: {0}")]
    Spawn(#[source] io::Error),
    /// The drain thread stopped with an I/O error.
    #[error("output drain failed: {0}")]
    Drain(#[source] io::Error),
    /// The drain thread panicked before reporting completion.
    #[error("output drain thread panicked")]
    DrainPanicked,
}
