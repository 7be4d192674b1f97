//! JSON-RPC 2.0 and MCP message shapes used by the stdio server

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC protocol version string
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revision this server speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC "parse error"
pub const PARSE_ERROR: i64 = -32700;
/// JSON-RPC "invalid request"
pub const INVALID_REQUEST: i64 = -32600;
/// JSON-RPC "method not found"
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Incoming request or notification
///
/// Notifications carry no `id` and never get a response.
#[derive(Clone, Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// Must be "2.0"
    pub jsonrpc: String,
    /// Request id; absent for notifications
    #[serde(default)]
    pub id: Option<Value>,
    /// Method name
    pub method: String,
    /// Method parameters
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Returns true if no response is expected
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Outgoing response
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Always "2.0"
    pub jsonrpc: String,
    /// Id of the request being answered (null if it could not be read)
    pub id: Value,
    /// Successful result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Successful response
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Error response
    pub fn failure(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC error object
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Numeric error code
    pub code: i64,
    /// Human-readable message
    pub message: String,
    /// Optional structured details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Create an error without details
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// Parameters of `tools/call`
#[derive(Clone, Debug, Deserialize)]
pub struct CallToolParams {
    /// Tool name
    pub name: String,
    /// Tool arguments (validated by the tool)
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// One content block of a tool result
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Plain text
    Text {
        /// The text
        text: String,
    },
}

/// Result of `tools/call`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    /// Content blocks, one per exported file
    pub content: Vec<ToolContent>,
    /// Set when the tool ran but failed
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl CallToolResult {
    /// Successful result with one text block per string
    pub fn texts(texts: Vec<String>) -> Self {
        Self {
            content: texts
                .into_iter()
                .map(|text| ToolContent::Text { text })
                .collect(),
            is_error: false,
        }
    }

    /// Failed result carrying a single error message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }
}
