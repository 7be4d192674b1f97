//! MCP tool server
//!
//! Exposes [`NotionExporter`](crate::NotionExporter) as the single tool
//! `notion_export_get_result` over line-delimited JSON-RPC 2.0 on stdio.
//!
//! ```json
//! {"jsonrpc":"2.0","id":1,"method":"tools/call",
//!  "params":{"name":"notion_export_get_result",
//!            "arguments":{"id":"0123456789abcdef0123456789abcdef"}}}
//! ```
//!
//! Argument validation happens here; the exporter only sees well-formed ids.
//! Export failures come back as tool results with `isError: true` so the
//! calling agent can read the message.

mod server;
mod tool;
mod types;


pub use server::{McpServer, SERVER_NAME};
pub use tool::{GetExportResultArgs, MarkdownExport, TOOL_NAME, tool_definition};
pub use types::{
    CallToolParams, CallToolResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    PROTOCOL_VERSION, ToolContent,
};
