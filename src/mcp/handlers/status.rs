//! MCP handler for status polling.

use std::sync::Arc;

use crate::processing::{DocumentId, ProcessingService};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;

use super::{map_processing_error, parse_arguments};

/// Request payload accepted by the `get-status` tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct StatusToolRequest {
    /// Identifier supplied when the document was submitted.
    pub(crate) document_id: DocumentId,
}

/// Handle the `get-status` tool, returning the latest recorded status.
pub(crate) async fn handle_get_status(
    processing: &Arc<ProcessingService>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let StatusToolRequest { document_id } = parse_arguments(arguments)?;
    let status = processing
        .get_status(document_id)
        .map_err(map_processing_error)?;
    let payload = serde_json::to_value(&status)
        .map_err(|err| McpError::internal_error(err.to_string(), None))?;
    Ok(CallToolResult::structured(payload))
}
