//! JSON-lines host protocol.
//!
//! One request per line, one response line per request, in order:
//!
//! ```text
//! -> {"id": 1, "call": "eval", "args": ["print(1)"]}
//! <- {"id":1,"result":{"success":true,"output":"1","error":null}}
//! -> {"id": 2, "call": "version"}
//! <- {"id":2,"result":"Golite Bridge v0.3.0"}
//! ```
//!
//! Requests that cannot be dispatched get an `error` string instead of a
//! `result`. Blank lines are skipped.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::Bridge;

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed request: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("unknown call `{0}` (expected eval, version or reset)")]
    UnknownCall(String),
    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("protocol I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Value,
    pub call: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Response {
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    fn ok(id: Value, result: Value) -> Self {
        Response {
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Value, err: &ProtocolError) -> Self {
        Response {
            id,
            result: None,
            error: Some(err.to_string()),
        }
    }
}

/// Dispatch one decoded request.
pub fn dispatch(bridge: &Bridge, request: Request) -> Response {
    let Request { id, call, args } = request;
    let result = match call.as_str() {
        "eval" => serde_json::to_value(bridge.eval(&args)),
        "version" => Ok(Value::from(bridge.version())),
        "reset" => serde_json::to_value(bridge.reset()),
        _ => return Response::err(id, &ProtocolError::UnknownCall(call)),
    };
    match result {
        Ok(result) => Response::ok(id, result),
        Err(err) => Response::err(id, &ProtocolError::Encode(err)),
    }
}

/// Decode and dispatch one request line.
pub fn handle_line(bridge: &Bridge, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => dispatch(bridge, request),
        Err(err) => {
            let err = ProtocolError::Malformed(err);
            tracing::warn!(%err, "bad request line");
            Response::err(Value::Null, &err)
        }
    }
}

/// Serve requests from `input` until end of stream.
pub fn serve(
    bridge: &Bridge,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<(), ProtocolError> {
    let mut handled = 0usize;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(bridge, &line);
        serde_json::to_writer(&mut output, &response).map_err(ProtocolError::Encode)?;
        output.write_all(b"\n")?;
        output.flush()?;
        handled += 1;
    }
    tracing::info!(handled, "input closed");
    Ok(())
}

#[cfg(test)]
mod tests;
