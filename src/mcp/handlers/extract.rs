//! MCP handler for standalone text extraction.

use std::sync::Arc;

use crate::processing::ProcessingService;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;
use serde_json::json;

use super::{map_processing_error, parse_arguments};

/// Request payload accepted by the `extract-text` tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct ExtractToolRequest {
    /// Path of the file to read.
    pub(crate) file_path: String,
    /// Optional format hint; the file extension wins on disagreement.
    #[serde(default)]
    pub(crate) document_type: Option<String>,
}

/// Handle the `extract-text` tool without recording any status.
pub(crate) async fn handle_extract_text(
    processing: &Arc<ProcessingService>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let ExtractToolRequest {
        file_path,
        document_type,
    } = parse_arguments(arguments)?;
    if file_path.trim().is_empty() {
        return Err(McpError::invalid_params("`filePath` must not be empty", None));
    }

    let text = processing
        .extract_text(&file_path, document_type.as_deref())
        .await
        .map_err(map_processing_error)?;

    Ok(CallToolResult::structured(json!({
        "filePath": file_path,
        "textLength": text.chars().count(),
        "extractedText": text,
        "success": true,
    })))
}
