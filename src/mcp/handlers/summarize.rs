//! Handler for the `summarize` MCP tool.

use std::sync::Arc;

use crate::processing::ProcessingService;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;
use serde_json::json;

use super::parse_arguments;

/// Request payload accepted by the `summarize` tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SummarizeToolRequest {
    text: String,
    #[serde(default)]
    max_length: Option<usize>,
}

/// Handle the `summarize` tool invocation.
pub(crate) async fn handle_summarize(
    processing: &Arc<ProcessingService>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let SummarizeToolRequest { text, max_length } = parse_arguments(arguments)?;
    if max_length == Some(0) {
        return Err(McpError::invalid_params("`maxLength` must be positive", None));
    }

    let summary = processing.summarize(&text, max_length);
    Ok(CallToolResult::structured(json!({
        "originalLength": text.chars().count(),
        "summaryLength": summary.chars().count(),
        "summary": summary,
        "success": true,
    })))
}
