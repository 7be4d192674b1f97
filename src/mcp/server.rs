//! Line-delimited JSON-RPC server loop

use crate::error::{RPC_INTERNAL_ERROR, RPC_INVALID_PARAMS, ToToolError};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::tool::{GetExportResultArgs, MarkdownExport, TOOL_NAME, tool_definition};
use super::types::{
    CallToolParams, CallToolResult, INVALID_REQUEST, JSONRPC_VERSION, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
};

/// Name reported in `initialize`
pub const SERVER_NAME: &str = "notion-export-mcp-server";

/// MCP server exposing the export tool
pub struct McpServer<E> {
    exporter: E,
}

impl<E: MarkdownExport> McpServer<E> {
    /// Server backed by `exporter`
    pub fn new(exporter: E) -> Self {
        Self { exporter }
    }

    /// The export backend
    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    /// Serve requests on stdin/stdout until EOF or cancellation
    pub async fn run_stdio(&self, cancel: &CancellationToken) -> std::io::Result<()> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        info!("Notion Export MCP Server running on stdio");
        self.run(stdin, stdout, cancel).await
    }

    /// Serve line-delimited requests from `reader`, writing responses to `writer`
    ///
    /// Requests are handled one at a time in arrival order.
    pub async fn run<R, W>(
        &self,
        reader: R,
        mut writer: W,
        cancel: &CancellationToken,
    ) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        loop {
            let line = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("MCP server shutting down");
                    break;
                }
                line = lines.next_line() => line?,
            };
            let Some(line) = line else {
                debug!("stdin closed");
                break;
            };

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("MCP server shutting down mid-request");
                    break;
                }
                response = self.handle_line(&line) => response,
            };

            if let Some(response) = response {
                let mut out = serde_json::to_vec(&response)?;
                out.push(b'\n');
                writer.write_all(&out).await?;
                writer.flush().await?;
            }
        }
        Ok(())
    }

    /// Handle one raw message; `None` for notifications and blank lines
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "unparseable JSON-RPC message");
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::new(PARSE_ERROR, format!("parse error: {}", e)),
                ));
            }
        };

        self.handle_request(request).await
    }

    /// Dispatch a parsed request
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "notification received");
            return None;
        }
        let id = request.id.unwrap_or(Value::Null);

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::failure(
                id,
                JsonRpcError::new(INVALID_REQUEST, "jsonrpc must be \"2.0\""),
            ));
        }

        let outcome = match request.method.as_str() {
            "initialize" => Ok(initialize_result(request.params.as_ref())),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": [tool_definition()] })),
            "tools/call" => self.call_tool(request.params).await,
            other => Err(JsonRpcError::new(
                METHOD_NOT_FOUND,
                format!("method not found: {}", other),
            )),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: CallToolParams = params
            .map(serde_json::from_value::<CallToolParams>)
            .transpose()
            .map_err(|e| JsonRpcError::new(RPC_INVALID_PARAMS, format!("invalid params: {}", e)))?
            .ok_or_else(|| JsonRpcError::new(RPC_INVALID_PARAMS, "Params are required"))?;

        if params.name != TOOL_NAME {
            return Err(JsonRpcError::new(
                RPC_INVALID_PARAMS,
                format!("Unknown tool: {}", params.name),
            ));
        }

        let args = GetExportResultArgs::parse(params.arguments)?;
        info!(id = %args.id, recursive = args.recursive, "export requested");

        let result = match self
            .exporter
            .export_markdown(&args.id, args.recursive)
            .await
        {
            Ok(pages) => {
                info!(id = %args.id, files = pages.len(), "export returned");
                CallToolResult::texts(pages)
            }
            Err(e) => {
                error!(
                    id = %args.id,
                    code = e.error_code(),
                    rpc_code = e.rpc_code(),
                    error = %e,
                    "export failed"
                );
                CallToolResult::error(e.to_string())
            }
        };

        serde_json::to_value(result)
            .map_err(|e| JsonRpcError::new(RPC_INTERNAL_ERROR, e.to_string()))
    }
}

fn initialize_result(params: Option<&Value>) -> Value {
    // Echo the client's protocol revision if it sent one
    let version = params
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str)
        .unwrap_or(PROTOCOL_VERSION);
    json!({
        "protocolVersion": version,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}
