use golite_interp::InitError;

/// Failure to obtain a usable session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The interpreter could not be constructed.
    #[error("failed to initialize interpreter: {0}")]
    Init(#[from] InitError),
    /// Another call holds the session.
    #[error("busy: another evaluation is in progress")]
    Busy,
}
