//! Golite Bridge: a host-facing boundary around a persistent Golite session.
//!
//! The host loads a [`Bridge`] once and then issues three calls:
//!
//! - `eval(source)` runs Go-subset source in the live session and returns
//!   `{success, output, error}` with everything the code printed.
//! - `version()` returns an identification string.
//! - `reset()` swaps in a fresh session and returns `{success, message}`.
//!
//! The `golite` binary exposes the same calls over a JSON-lines protocol
//! (see [`protocol`]).

pub mod api;
pub mod config;
pub mod protocol;
pub mod telemetry;

pub use api::{Bridge, EvalResponse, ResetResponse, NON_STRING_ERROR, VERSION};
pub use config::{BridgeConfig, ConfigError};
pub use protocol::{handle_line, serve, ProtocolError, Request, Response};
