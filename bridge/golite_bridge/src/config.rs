//! Bridge configuration.

use golite_capture::DEFAULT_PIPE_CAPACITY;
use golite_interp::DEFAULT_MAX_CALL_DEPTH;

pub const MAX_CALL_DEPTH_VAR: &str = "GOLITE_MAX_CALL_DEPTH";
pub const CAPTURE_CAPACITY_VAR: &str = "GOLITE_CAPTURE_CAPACITY";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}={value:?}: expected a positive integer")]
    NotPositive { var: &'static str, value: String },
}

/// Knobs for a [`Bridge`](crate::Bridge).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Nested user function calls allowed before a fault.
    pub max_call_depth: usize,
    /// Unread output chunks buffered before evaluated code blocks on print.
    pub capture_capacity: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            capture_capacity: DEFAULT_PIPE_CAPACITY,
        }
    }
}

impl BridgeConfig {
    /// Defaults overridden by `GOLITE_MAX_CALL_DEPTH` and `GOLITE_CAPTURE_CAPACITY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = BridgeConfig::default();
        if let Some(value) = lookup(MAX_CALL_DEPTH_VAR) {
            config.max_call_depth = positive(MAX_CALL_DEPTH_VAR, value)?;
        }
        if let Some(value) = lookup(CAPTURE_CAPACITY_VAR) {
            config.capture_capacity = positive(CAPTURE_CAPACITY_VAR, value)?;
        }
        Ok(config)
    }
}

fn positive(var: &'static str, value: String) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::NotPositive { var, value }),
    }
}

#[cfg(test)]
mod tests;
