//! Formatting helpers shared across MCP handlers and resources.

use crate::processing::{Format, PipelineSettings};
use rmcp::model::ResourceContents;
use serde::Serialize;

pub(crate) const APPLICATION_JSON: &str = "application/json";

/// Serialize a value to JSON, falling back to compact formatting on error.
pub(crate) fn serialize_json<T: Serialize>(value: &T, context_uri: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|error| {
        tracing::warn!(uri = context_uri, %error, "Failed to serialize JSON prettily");
        serde_json::to_string(value).unwrap_or_else(|_| "{}".into())
    })
}

/// Build JSON resource contents for MCP resource responses.
pub(crate) fn json_resource_contents(uri: &str, text: String) -> ResourceContents {
    ResourceContents::TextResourceContents {
        uri: uri.to_string(),
        mime_type: Some(APPLICATION_JSON.into()),
        text,
        meta: None,
    }
}

/// Recognized formats returned by the `formats` resource.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FormatsSnapshot {
    /// One entry per format with a dedicated handler.
    pub(crate) formats: Vec<FormatEntry>,
    /// How files with other extensions are handled.
    pub(crate) fallback: &'static str,
}

/// A single recognized format and the extensions routed to it.
#[derive(Debug, Serialize)]
pub(crate) struct FormatEntry {
    /// Format label.
    pub(crate) name: String,
    /// Extensions, without the leading dot.
    pub(crate) extensions: Vec<&'static str>,
}

impl FormatsSnapshot {
    pub(crate) fn current() -> Self {
        Self {
            formats: Format::RECOGNIZED
                .iter()
                .map(|format| FormatEntry {
                    name: format.to_string(),
                    extensions: format.extensions().to_vec(),
                })
                .collect(),
            fallback: "text",
        }
    }
}

/// Effective pipeline defaults returned by the `settings` resource.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SettingsSnapshot {
    /// Default summary bound in characters.
    pub(crate) summary_max_length: usize,
    /// Default keyword count.
    pub(crate) max_keywords: usize,
    /// Characters of extracted text echoed back in results.
    pub(crate) preview_chars: usize,
    /// Re-submission policy label.
    pub(crate) resubmission_policy: String,
    /// Extraction failure policy label.
    pub(crate) extraction_failure: String,
    /// Retention window for terminal statuses, when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) status_ttl_secs: Option<u64>,
}

impl From<&PipelineSettings> for SettingsSnapshot {
    fn from(settings: &PipelineSettings) -> Self {
        Self {
            summary_max_length: settings.summary_max_length,
            max_keywords: settings.max_keywords,
            preview_chars: settings.preview_chars,
            resubmission_policy: policy_label(&settings.resubmission_policy),
            extraction_failure: policy_label(&settings.extraction_failure),
            status_ttl_secs: settings.status_ttl.map(|ttl| ttl.as_secs()),
        }
    }
}

fn policy_label<T: Serialize>(policy: &T) -> String {
    match serde_json::to_value(policy) {
        Ok(serde_json::Value::String(label)) => label,
        _ => String::new(),
    }
}
