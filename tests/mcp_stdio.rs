//! MCP server round-trip over an in-memory stdio pair

mod common;

use common::{exporter_for, mount_export};
use notion_export::mcp::{JsonRpcResponse, McpServer, TOOL_NAME};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use wiremock::MockServer;

async fn send(writer: &mut (impl AsyncWriteExt + Unpin), message: Value) {
    let mut line = message.to_string();
    line.push('\n');
    writer.write_all(line.as_bytes()).await.unwrap();
}

#[tokio::test]
async fn tool_call_exports_through_real_exporter() {
    let notion = MockServer::start().await;
    mount_export(&notion, &[("Page.md", b"  # Page\n"), ("Page/Sub.md", b"# Sub")]).await;

    let (client, server_side) = tokio::io::duplex(4096);
    let (server_read, server_write) = tokio::io::split(server_side);
    let (client_read, mut client_write) = tokio::io::split(client);
    let cancel = CancellationToken::new();

    let server = McpServer::new(exporter_for(&notion));
    let serve = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            server
                .run(BufReader::new(server_read), server_write, &cancel)
                .await
        })
    };

    send(
        &mut client_write,
        json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} }),
    )
    .await;
    send(
        &mut client_write,
        json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
    )
    .await;
    send(
        &mut client_write,
        json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": {
                "name": TOOL_NAME,
                "arguments": { "id": "0123456789abcdef0123456789abcdef", "recursive": true }
            }
        }),
    )
    .await;

    let mut lines = BufReader::new(client_read).lines();
    let init: JsonRpcResponse =
        serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
    let call: JsonRpcResponse =
        serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();

    assert_eq!(init.id, json!(1));
    assert_eq!(call.id, json!(2));
    let result = call.result.unwrap();
    assert_eq!(
        result["content"],
        json!([
            { "type": "text", "text": "# Page" },
            { "type": "text", "text": "# Sub" }
        ])
    );
    assert!(result.get("isError").is_none());

    // Closing the client's write half ends the server loop
    client_write.shutdown().await.unwrap();
    drop(client_write);
    serve.await.unwrap().unwrap();
}

#[tokio::test]
async fn invalid_id_is_rejected_without_calling_notion() {
    let notion = MockServer::start().await;
    let server = McpServer::new(exporter_for(&notion));

    let request = json!({
        "jsonrpc": "2.0",
        "id": 7,
        "method": "tools/call",
        "params": { "name": TOOL_NAME, "arguments": { "id": "not-a-page" } }
    })
    .to_string();

    let mut output = Vec::new();
    server
        .run(request.as_bytes(), &mut output, &CancellationToken::new())
        .await
        .unwrap();

    let response: JsonRpcResponse =
        serde_json::from_str(String::from_utf8(output).unwrap().trim()).unwrap();
    assert_eq!(response.error.unwrap().code, -32602);
    assert!(notion.received_requests().await.unwrap().is_empty());
}
