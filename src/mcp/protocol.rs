//! JSON-RPC 2.0 framing helpers.

use serde::Deserialize;
use serde_json::{Value, json};

/// JSON-RPC version tag.
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revision advertised when the client names none.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Input was not valid JSON.
pub const PARSE_ERROR: i64 = -32700;

/// Input was JSON but not a request object.
pub const INVALID_REQUEST: i64 = -32600;

/// The method is not served.
pub const METHOD_NOT_FOUND: i64 = -32601;

/// The method parameters are unusable.
pub const INVALID_PARAMS: i64 = -32602;

/// Incoming JSON-RPC request or notification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol tag; tolerated when absent.
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Request identifier; absent or `null` for notifications.
    #[serde(default)]
    pub id: Option<Value>,
    /// Method name.
    pub method: String,
    /// Method parameters.
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Returns whether the sender awaits a response.
    #[must_use]
    pub const fn expects_response(&self) -> bool {
        !matches!(self.id, None | Some(Value::Null))
    }
}

/// Builds a success response.
#[must_use]
pub fn response(id: Option<Value>, result: Value) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id.unwrap_or(Value::Null),
        "result": result,
    })
}

/// Builds an error response.
#[must_use]
pub fn error(id: Option<Value>, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id.unwrap_or(Value::Null),
        "error": { "code": code, "message": message },
    })
}

/// Wraps a tool payload as MCP `tools/call` result content.
#[must_use]
pub fn tool_result(payload: &Value, is_error: bool) -> Value {
    json!({
        "content": [{ "type": "text", "text": payload.to_string() }],
        "isError": is_error,
    })
}
