//! MCP handler for full document runs.

use std::sync::Arc;

use crate::processing::{DocumentRequest, ProcessingService};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};

use super::{map_processing_error, parse_arguments};

/// Handle the `process-document` tool by running every pipeline stage for one file.
///
/// The result mirrors the HTTP `/process-document` body so clients can share decoders.
pub(crate) async fn handle_process_document(
    processing: &Arc<ProcessingService>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let request: DocumentRequest = parse_arguments(arguments)?;
    if request.file_path.trim().is_empty() {
        return Err(McpError::invalid_params("`filePath` must not be empty", None));
    }

    let result = processing
        .submit_document(request)
        .await
        .map_err(map_processing_error)?;

    let payload = serde_json::to_value(&result)
        .map_err(|err| McpError::internal_error(err.to_string(), None))?;
    Ok(CallToolResult::structured(payload))
}
