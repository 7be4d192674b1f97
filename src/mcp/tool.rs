//! The `notion_export_get_result` tool

use crate::config::ExportOverrides;
use crate::error::{RPC_INVALID_PARAMS, Result};
use crate::exporter::NotionExporter;
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::LazyLock;

use super::types::JsonRpcError;

/// Name the tool is registered under
pub const TOOL_NAME: &str = "notion_export_get_result";

const TOOL_DESCRIPTION: &str = "Export a Notion page, block or database and return its Markdown files";

#[allow(clippy::expect_used)]
static PAGE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[0-9a-z]{32}$").expect("page id pattern is valid"));

/// Backend the tool calls into
///
/// [`NotionExporter`] is the production implementation.
#[async_trait]
pub trait MarkdownExport: Send + Sync {
    /// Export `id` and return one string per Markdown file
    async fn export_markdown(&self, id: &str, recursive: bool) -> Result<Vec<String>>;
}

#[async_trait]
impl MarkdownExport for NotionExporter {
    async fn export_markdown(&self, id: &str, recursive: bool) -> Result<Vec<String>> {
        self.export(id, &ExportOverrides::recursive(recursive)).await
    }
}

/// Validated arguments of `notion_export_get_result`
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GetExportResultArgs {
    /// Notion page id (32 lowercase alphanumerics, dashes allowed)
    pub id: String,
    /// Export child pages too
    #[serde(default)]
    pub recursive: bool,
}

impl GetExportResultArgs {
    /// Parse and validate raw tool arguments
    pub fn parse(arguments: Option<Value>) -> std::result::Result<Self, JsonRpcError> {
        let value = arguments.unwrap_or(Value::Null);
        let args: Self = serde_json::from_value(value).map_err(|e| {
            JsonRpcError::new(RPC_INVALID_PARAMS, format!("invalid arguments: {}", e))
        })?;

        let bare = args.id.replace('-', "");
        if !PAGE_ID.is_match(&bare) {
            return Err(JsonRpcError {
                code: RPC_INVALID_PARAMS,
                message: "Notion page id must be 32 characters of 0-9a-z".to_string(),
                data: Some(json!({ "field": "id" })),
            });
        }
        Ok(args)
    }
}

/// Tool listing entry for `tools/list`
pub fn tool_definition() -> Value {
    json!({
        "name": TOOL_NAME,
        "description": TOOL_DESCRIPTION,
        "inputSchema": {
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "Notion page id",
                    "pattern": "^[0-9a-z-]+$"
                },
                "recursive": {
                    "type": "boolean",
                    "description": "Export child pages recursively",
                    "default": false
                }
            },
            "required": ["id"],
            "additionalProperties": false
        }
    })
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_id_with_default_recursive() {
        let args =
            GetExportResultArgs::parse(Some(json!({ "id": "0123456789abcdef0123456789abcdef" })))
                .unwrap();
        assert_eq!(args.id, "0123456789abcdef0123456789abcdef");
        assert!(!args.recursive);
    }

    #[test]
    fn accepts_dashed_ids_and_recursive_flag() {
        let args = GetExportResultArgs::parse(Some(json!({
            "id": "01234567-89ab-cdef-0123-456789abcdef",
            "recursive": true
        })))
        .unwrap();
        assert!(args.recursive);
    }

    #[test]
    fn rejects_uppercase_short_and_missing_ids() {
        let cases = [
            json!({ "id": "0123456789ABCDEF0123456789ABCDEF" }),
            json!({ "id": "0123456789abcdef" }),
            json!({ "id": "0123456789abcdef0123456789abcdef!" }),
            json!({ "recursive": true }),
            json!({ "id": 42 }),
        ];
        for case in cases {
            let err = GetExportResultArgs::parse(Some(case.clone())).unwrap_err();
            assert_eq!(err.code, RPC_INVALID_PARAMS, "case {case}");
        }
        assert!(GetExportResultArgs::parse(None).is_err());
    }

    #[test]
    fn definition_names_tool_and_requires_id() {
        let def = tool_definition();
        assert_eq!(def["name"], TOOL_NAME);
        assert_eq!(def["inputSchema"]["required"], json!(["id"]));
    }
}
