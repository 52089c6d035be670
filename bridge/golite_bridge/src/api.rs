//! The three calls exposed to the host: `eval`, `version` and `reset`.
//!
//! Results are plain serde records so any host binding can turn them into
//! its own maps. The field names are the wire keys.

use golite_capture::{shared_stdout, SharedSink};
use golite_interp::InterpOptions;
use golite_session::{EvaluationResult, GoliteFactory, ResetOutcome, SessionError, SessionManager};
use serde::{Deserialize, Serialize};

use crate::config::BridgeConfig;

/// Identification string returned by `version`.
pub const VERSION: &str = concat!("Golite Bridge v", env!("CARGO_PKG_VERSION"));

/// Returned when `eval` gets one argument that is not a string.
pub const NON_STRING_ERROR: &str = "eval argument must be a string (Go source code)";

/// Result of `eval`. `error` is `null` on success.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalResponse {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
}

impl From<EvaluationResult> for EvalResponse {
    fn from(result: EvaluationResult) -> Self {
        let (success, output, error) = result.into_parts();
        EvalResponse {
            success,
            output,
            error,
        }
    }
}

/// Result of `reset`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
}

impl From<ResetOutcome> for ResetResponse {
    fn from(outcome: ResetOutcome) -> Self {
        ResetResponse {
            success: outcome.success(),
            message: outcome.message().to_string(),
        }
    }
}

/// A loaded bridge: one persistent session behind the boundary calls.
pub struct Bridge {
    sessions: SessionManager<GoliteFactory>,
}

impl Bridge {
    /// Bridge whose uncaptured output goes to the process stdout.
    pub fn new(config: &BridgeConfig) -> Result<Self, SessionError> {
        Self::with_sink(config, shared_stdout())
    }

    /// Bridge writing through `sink` whenever no capture is active.
    pub fn with_sink(config: &BridgeConfig, sink: SharedSink) -> Result<Self, SessionError> {
        let factory = GoliteFactory::new(InterpOptions {
            max_call_depth: config.max_call_depth,
        });
        let sessions = SessionManager::new(factory, sink, config.capture_capacity)?;
        tracing::info!(version = VERSION, "bridge ready");
        Ok(Bridge { sessions })
    }

    /// `eval(args...)` with host-supplied JSON arguments.
    pub fn eval(&self, args: &[serde_json::Value]) -> EvalResponse {
        if let [other] = args {
            if !other.is_string() {
                tracing::debug!(kind = json_kind(other), "rejected non-string eval argument");
                return EvalResponse {
                    success: false,
                    output: String::new(),
                    error: Some(NON_STRING_ERROR.to_string()),
                };
            }
        }
        // The executor checks the count.
        let sources: Vec<&str> = args
            .iter()
            .map(|arg| arg.as_str().unwrap_or_default())
            .collect();
        self.sessions.eval(&sources).into()
    }

    pub fn eval_source(&self, source: &str) -> EvalResponse {
        self.sessions.eval(&[source]).into()
    }

    pub fn version(&self) -> &'static str {
        VERSION
    }

    pub fn reset(&self) -> ResetResponse {
        self.sessions.reset().into()
    }

    pub fn sink(&self) -> &SharedSink {
        self.sessions.sink()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("version", &VERSION)
            .field("capturing", &self.sink().is_capturing())
            .finish_non_exhaustive()
    }
}
