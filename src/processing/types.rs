//! Core data types and error definitions for the processing pipeline.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use super::status::StatusError;

/// Caller-assigned identifier of a document run.
pub type DocumentId = u64;

/// Immutable input describing one document submission.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    /// Identifier the caller polls status under.
    pub document_id: DocumentId,
    /// Path of the file to process.
    pub file_path: String,
    /// Free-form per-run options; see [`RunOptions`] for the recognized keys.
    #[serde(default)]
    pub options: Map<String, Value>,
}

impl DocumentRequest {
    /// Build a request without options.
    pub fn new(document_id: DocumentId, file_path: impl Into<String>) -> Self {
        Self {
            document_id,
            file_path: file_path.into(),
            options: Map::new(),
        }
    }
}

/// Lifecycle state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// The pipeline is still executing stages.
    Processing,
    /// Every stage finished and a result is attached.
    Completed,
    /// The run stopped early; the message explains why.
    Error,
}

impl RunState {
    /// Whether the state ends a run.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Processing)
    }
}

/// Snapshot of a document's progress as seen by pollers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStatus {
    /// Document the status belongs to.
    pub document_id: DocumentId,
    /// Lifecycle state.
    pub status: RunState,
    /// Progress checkpoint in `[0, 100]`.
    pub progress: u8,
    /// Human-readable description of the current step or failure.
    pub message: String,
    /// Final result, present only when `status` is `completed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ProcessingResult>,
    /// RFC3339 timestamp of the last transition.
    pub updated_at: String,
}

/// Output of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    /// Document the result belongs to.
    pub document_id: DocumentId,
    /// Leading slice of the extracted text, suffixed with `...` when cut.
    pub extracted_text_preview: String,
    /// Length of the full extracted text in characters.
    pub text_length: usize,
    /// Extractive summary of the text.
    pub summary: String,
    /// Structural statistics about the document.
    pub metadata: Metadata,
    /// Keyword candidates ordered by descending frequency.
    pub keywords: Vec<String>,
    /// RFC3339 timestamp at which the result was assembled.
    pub processed_at: String,
}

/// Structural statistics derived from extracted text and the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Size of the source file on disk.
    pub file_size_bytes: u64,
    /// Whitespace-delimited token count.
    pub word_count: usize,
    /// Number of characters (code points).
    pub character_count: usize,
    /// Number of newline-delimited segments.
    pub line_count: usize,
    /// Extension including the leading dot, or empty.
    pub file_extension: String,
    /// Final path component.
    pub file_name: String,
}

/// Discrete pipeline step, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Text extraction.
    Extract,
    /// Metadata generation.
    Metadata,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Extract => "extract",
            Self::Metadata => "metadata",
        };
        f.write_str(label)
    }
}

/// Errors emitted by the document processing pipeline.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Input file does not exist.
    #[error("File not found: {path}")]
    NotFound {
        /// Path the caller supplied.
        path: String,
    },
    /// No run has been recorded for the document.
    #[error("No processing status recorded for document {0}")]
    StatusNotFound(DocumentId),
    /// A run for the document is still in flight and re-submission is rejected.
    #[error("Document {0} is already being processed")]
    InFlight(DocumentId),
    /// Request was malformed and rejected before the run started.
    #[error("Invalid request: {0}")]
    Validation(String),
    /// A pipeline stage failed.
    #[error("Stage '{stage}' failed: {detail}")]
    Stage {
        /// Stage that faulted.
        stage: Stage,
        /// Human-readable failure detail.
        detail: String,
    },
    /// The detached run task stopped without producing an outcome.
    #[error("Processing task stopped: {0}")]
    Interrupted(String),
}

impl From<StatusError> for ProcessingError {
    fn from(error: StatusError) -> Self {
        match error {
            StatusError::NotFound(id) => Self::StatusNotFound(id),
            StatusError::InFlight(id) => Self::InFlight(id),
        }
    }
}

/// Policy applied when a document id is submitted while a run for it is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResubmissionPolicy {
    /// Start a new run; writes from the superseded run are discarded.
    #[default]
    LatestWins,
    /// Refuse the new submission until the current run is terminal.
    RejectInFlight,
}

impl std::str::FromStr for ResubmissionPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "latest-wins" | "latest" => Ok(Self::LatestWins),
            "reject-in-flight" | "reject" => Ok(Self::RejectInFlight),
            _ => Err(()),
        }
    }
}

/// Policy applied when text extraction fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionFailurePolicy {
    /// Terminate the run in the error state.
    #[default]
    Abort,
    /// Continue with the failure message as the document text.
    Embed,
}

impl std::str::FromStr for ExtractionFailurePolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "embed" => Ok(Self::Embed),
            _ => Err(()),
        }
    }
}

/// Tunables handed to [`crate::processing::ProcessingService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Default summary bound in characters.
    pub summary_max_length: usize,
    /// Default keyword count.
    pub max_keywords: usize,
    /// Characters of extracted text echoed back in results.
    pub preview_chars: usize,
    /// Re-submission handling for in-flight document ids.
    pub resubmission_policy: ResubmissionPolicy,
    /// Handling of extraction failures.
    pub extraction_failure: ExtractionFailurePolicy,
    /// Retention window for terminal statuses.
    pub status_ttl: Option<Duration>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        crate::config::Config::default().pipeline_settings()
    }
}

/// Per-run knobs resolved from [`DocumentRequest::options`] and the service defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Summary bound in characters.
    pub max_length: usize,
    /// Keyword count.
    pub max_keywords: usize,
    /// Preview length in characters.
    pub preview_chars: usize,
}

impl RunOptions {
    /// Resolve options, rejecting recognized keys that carry unusable values.
    pub fn resolve(
        options: &Map<String, Value>,
        settings: &PipelineSettings,
    ) -> Result<Self, ProcessingError> {
        Ok(Self {
            max_length: positive_option(options, "maxLength")?
                .unwrap_or(settings.summary_max_length),
            max_keywords: positive_option(options, "maxKeywords")?
                .unwrap_or(settings.max_keywords),
            preview_chars: positive_option(options, "previewChars")?
                .unwrap_or(settings.preview_chars),
        })
    }
}

fn positive_option(options: &Map<String, Value>, key: &str) -> Result<Option<usize>, ProcessingError> {
    match options.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .filter(|&n| n > 0)
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                ProcessingError::Validation(format!("`{key}` must be a positive integer"))
            }),
    }
}

/// Current UTC time formatted as RFC3339.
pub(crate) fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| OffsetDateTime::UNIX_EPOCH.to_string())
}
