//! Tool handlers for the MCP server.

use crate::processing::ProcessingError;
use rmcp::{ErrorData as McpError, model::JsonObject};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub mod extract;
pub mod metrics;
pub mod process;
pub mod status;
pub mod summarize;

/// Parse structured arguments supplied to a tool invocation.
pub(crate) fn parse_arguments<T: DeserializeOwned>(
    arguments: Option<JsonObject>,
) -> Result<T, McpError> {
    let value = arguments
        .map(Value::Object)
        .unwrap_or_else(|| Value::Object(JsonObject::new()));
    serde_json::from_value(value)
        .map_err(|err| McpError::invalid_params(format!("Invalid arguments: {err}"), None))
}

/// Translate pipeline errors into MCP error codes.
pub(crate) fn map_processing_error(error: ProcessingError) -> McpError {
    match error {
        ProcessingError::NotFound { .. } | ProcessingError::StatusNotFound(_) => {
            McpError::resource_not_found(error.to_string(), None)
        }
        ProcessingError::InFlight(_) | ProcessingError::Validation(_) => {
            McpError::invalid_params(error.to_string(), None)
        }
        ProcessingError::Stage { .. } | ProcessingError::Interrupted(_) => {
            McpError::internal_error(error.to_string(), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;
    use serde_json::json;

    #[test]
    fn missing_arguments_parse_as_empty_object() {
        #[derive(serde::Deserialize)]
        struct Empty {}
        assert!(parse_arguments::<Empty>(None).is_ok());
    }

    #[test]
    fn wrong_argument_types_are_invalid_params() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Args {
            count: u64,
        }
        let arguments = json!({ "count": "many" }).as_object().cloned();
        let err = parse_arguments::<Args>(arguments).expect_err("type mismatch");
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn processing_errors_map_to_protocol_codes() {
        let not_found = map_processing_error(ProcessingError::StatusNotFound(3));
        assert_eq!(not_found.code, ErrorCode::RESOURCE_NOT_FOUND);

        let in_flight = map_processing_error(ProcessingError::InFlight(3));
        assert_eq!(in_flight.code, ErrorCode::INVALID_PARAMS);

        let stage = map_processing_error(ProcessingError::Stage {
            stage: crate::processing::Stage::Extract,
            detail: "bad pdf".into(),
        });
        assert_eq!(stage.code, ErrorCode::INTERNAL_ERROR);
        assert!(stage.message.contains("bad pdf"));
    }
}
