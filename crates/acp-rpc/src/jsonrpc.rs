//! `eth_call` request construction and response classification.

use acp_core::SubmissionResult;
use serde_json::{json, Value};

/// Error text for a 2xx response whose body is not JSON.
pub const INVALID_JSON: &str = "invalid JSON";

/// A raw HTTP response from the JSON-RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcResponse {
    pub status: u16,
    /// Canonical reason phrase, e.g. `Internal Server Error`.
    pub reason: String,
    pub body: String,
}

/// JSON-RPC `id` sent with every call. Each call is its own HTTP request,
/// so responses never need to be matched by id.
pub const REQUEST_ID: u64 = 1;

/// `eth_call` against `to` with `data`, evaluated at the `latest` block.
pub fn eth_call_request(to: &str, data: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "eth_call",
        "params": [
            { "to": to, "data": data },
            "latest"
        ],
        "id": REQUEST_ID,
    })
}

/// Classify one response.
///
/// - non-2xx: failure `HTTP <code>: <reason>` (`HTTP <code>` when the
///   status has no reason phrase), body kept as the response
/// - 2xx, body not JSON: failure [`INVALID_JSON`]
/// - 2xx, top-level `error` present and not `null`: failure with its message
/// - otherwise: success
pub fn classify_response(proof_index: usize, response: &RpcResponse) -> SubmissionResult {
    if !(200..300).contains(&response.status) {
        let error = match response.reason.trim() {
            "" => format!("HTTP {}", response.status),
            reason => format!("HTTP {}: {reason}", response.status),
        };
        return SubmissionResult::failure(proof_index, Some(response.body.clone()), error);
    }

    let parsed: Value = match serde_json::from_str(&response.body) {
        Ok(v) => v,
        Err(_) => {
            return SubmissionResult::failure(proof_index, Some(response.body.clone()), INVALID_JSON)
        }
    };

    match parsed.get("error") {
        Some(err) if !err.is_null() => SubmissionResult::failure(
            proof_index,
            Some(response.body.clone()),
            error_message(err),
        ),
        _ => SubmissionResult::success(proof_index, response.body.clone()),
    }
}

/// Human-readable text of a JSON-RPC `error` value.
fn error_message(err: &Value) -> String {
    match err {
        Value::String(s) => s.clone(),
        Value::Object(obj) => match obj.get("message").and_then(Value::as_str) {
            Some(message) => message.to_string(),
            None => err.to_string(),
        },
        other => other.to_string(),
    }
}
