//! Processing service driving documents through extraction, metadata, summary, and keywords.

use crate::{
    metrics::{MetricsSnapshot, PipelineMetrics},
    processing::{
        extract::{self, ExtractionError},
        keywords::extract_keywords,
        metadata,
        status::{RunTicket, StatusTracker},
        summarize::summarize,
        types::{
            DocumentId, DocumentRequest, ExtractionFailurePolicy, PipelineSettings,
            ProcessingError, ProcessingResult, ProcessingStatus, RunOptions, Stage, now_rfc3339,
        },
    },
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const PREVIEW_ELLIPSIS: &str = "...";

/// Coordinates the document pipeline and publishes progress to the status tracker.
///
/// The service owns the shared [`StatusTracker`] and metrics registry so that the HTTP
/// surface, the MCP tools, and the CLI observe the same runs. Construct it once near process
/// start and share it through an `Arc`.
pub struct ProcessingService {
    tracker: Arc<StatusTracker>,
    metrics: Arc<PipelineMetrics>,
    settings: PipelineSettings,
}

/// Abstraction over the processing pipeline used by external surfaces (HTTP, MCP).
#[async_trait]
pub trait ProcessingApi: Send + Sync {
    /// Run the full pipeline for one document, publishing progress along the way.
    async fn submit_document(
        &self,
        request: DocumentRequest,
    ) -> Result<ProcessingResult, ProcessingError>;

    /// Fetch the latest status recorded for a document.
    fn get_status(&self, document_id: DocumentId) -> Result<ProcessingStatus, ProcessingError>;

    /// Extract text from a file without tracking status.
    async fn extract_text(
        &self,
        file_path: &str,
        format_hint: Option<&str>,
    ) -> Result<String, ProcessingError>;

    /// Summarize arbitrary text, using the configured bound when `max_length` is absent.
    fn summarize(&self, text: &str, max_length: Option<usize>) -> String;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl ProcessingService {
    /// Build a service with a fresh status tracker derived from `settings`.
    pub fn new(settings: PipelineSettings) -> Self {
        let tracker = Arc::new(StatusTracker::new(
            settings.resubmission_policy,
            settings.status_ttl,
        ));
        Self::with_tracker(settings, tracker)
    }

    /// Build a service around an existing tracker.
    pub fn with_tracker(settings: PipelineSettings, tracker: Arc<StatusTracker>) -> Self {
        tracing::debug!(
            resubmission_policy = ?settings.resubmission_policy,
            extraction_failure = ?settings.extraction_failure,
            "Processing service initialized"
        );
        Self {
            tracker,
            metrics: Arc::new(PipelineMetrics::new()),
            settings,
        }
    }

    /// Settings the service was built with.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Shared status tracker, for callers that poll directly.
    pub fn tracker(&self) -> &Arc<StatusTracker> {
        &self.tracker
    }

    /// Run the pipeline for `request`.
    ///
    /// Options are validated before any status is written. Afterwards the stages run on a
    /// detached task that owns the tracker and metrics, so every run ends in a terminal status
    /// even when the caller stops waiting: `completed` carrying the returned result, or `error`
    /// at the last published progress.
    pub async fn submit_document(
        &self,
        request: DocumentRequest,
    ) -> Result<ProcessingResult, ProcessingError> {
        let DocumentRequest {
            document_id,
            file_path,
            options,
        } = request;
        let options = RunOptions::resolve(&options, &self.settings)?;

        let ticket = self.tracker.initialize(document_id)?;
        self.metrics.record_started();
        tracing::info!(document_id, path = %file_path, "Processing document");

        let run = PipelineRun {
            tracker: Arc::clone(&self.tracker),
            metrics: Arc::clone(&self.metrics),
            failure_policy: self.settings.extraction_failure,
        };
        tokio::spawn(run.drive(ticket, file_path, options))
            .await
            .map_err(|err| ProcessingError::Interrupted(err.to_string()))?
    }

    /// Fetch the latest status recorded for a document.
    pub fn get_status(&self, document_id: DocumentId) -> Result<ProcessingStatus, ProcessingError> {
        self.tracker.get(document_id).map_err(ProcessingError::from)
    }

    /// Extract text from a file without touching the status tracker.
    pub async fn extract_text(
        &self,
        file_path: &str,
        format_hint: Option<&str>,
    ) -> Result<String, ProcessingError> {
        let path = PathBuf::from(file_path);
        ensure_exists(&path, file_path).await?;
        extract_on_blocking_pool(
            path,
            format_hint.map(str::to_string),
            self.settings.extraction_failure,
        )
        .await
    }

    /// Summarize arbitrary text.
    pub fn summarize(&self, text: &str, max_length: Option<usize>) -> String {
        summarize(text, max_length.unwrap_or(self.settings.summary_max_length))
    }

    /// Return the current pipeline metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

/// Collaborators owned by one detached run.
struct PipelineRun {
    tracker: Arc<StatusTracker>,
    metrics: Arc<PipelineMetrics>,
    failure_policy: ExtractionFailurePolicy,
}

impl PipelineRun {
    async fn drive(
        self,
        ticket: RunTicket,
        file_path: String,
        options: RunOptions,
    ) -> Result<ProcessingResult, ProcessingError> {
        let _guard = TerminalGuard {
            run: &self,
            ticket,
        };
        let document_id = ticket.document_id();

        match self.run_stages(&ticket, &file_path, options).await {
            Ok(result) => {
                self.tracker.complete(&ticket, result.clone());
                self.metrics.record_completed(result.text_length as u64);
                tracing::info!(
                    document_id,
                    text_length = result.text_length,
                    keywords = result.keywords.len(),
                    "Document processed"
                );
                Ok(result)
            }
            Err(error) => {
                let message = match &error {
                    ProcessingError::NotFound { .. } => error.to_string(),
                    _ => format!("Error: {error}"),
                };
                if self.tracker.fail(&ticket, message) {
                    self.metrics.record_failed();
                }
                tracing::error!(document_id, %error, "Document processing failed");
                Err(error)
            }
        }
    }

    async fn run_stages(
        &self,
        ticket: &RunTicket,
        file_path: &str,
        options: RunOptions,
    ) -> Result<ProcessingResult, ProcessingError> {
        let path = PathBuf::from(file_path);
        ensure_exists(&path, file_path).await?;

        self.tracker.advance(ticket, 25, "Extracting text");
        let text = extract_on_blocking_pool(path.clone(), None, self.failure_policy).await?;

        self.tracker.advance(ticket, 50, "Analyzing content");
        let metadata = metadata::generate(&text, &path)
            .await
            .map_err(|err| ProcessingError::Stage {
                stage: Stage::Metadata,
                detail: err.to_string(),
            })?;

        self.tracker.advance(ticket, 75, "Generating summary");
        let summary = summarize(&text, options.max_length);
        let keywords = extract_keywords(&text, options.max_keywords);

        Ok(ProcessingResult {
            document_id: ticket.document_id(),
            extracted_text_preview: preview(&text, options.preview_chars),
            text_length: metadata.character_count,
            summary,
            metadata,
            keywords,
            processed_at: now_rfc3339(),
        })
    }
}

/// Fails the run if it is dropped before reaching a terminal status, e.g. on panic.
/// Writes after `complete` or `fail` are discarded by the tracker.
struct TerminalGuard<'a> {
    run: &'a PipelineRun,
    ticket: RunTicket,
}

impl Drop for TerminalGuard<'_> {
    fn drop(&mut self) {
        let stopped = ProcessingError::Interrupted("run stopped before completion".into());
        if self.run.tracker.fail(&self.ticket, format!("Error: {stopped}")) {
            self.run.metrics.record_failed();
            tracing::error!(
                document_id = self.ticket.document_id(),
                "Processing run stopped before reaching a terminal status"
            );
        }
    }
}

/// Extract text on the blocking pool and apply the failure policy.
async fn extract_on_blocking_pool(
    path: PathBuf,
    format_hint: Option<String>,
    failure_policy: ExtractionFailurePolicy,
) -> Result<String, ProcessingError> {
    let outcome =
        tokio::task::spawn_blocking(move || extract::extract(&path, format_hint.as_deref()))
            .await
            .map_err(|err| ProcessingError::Stage {
                stage: Stage::Extract,
                detail: format!("extraction task aborted: {err}"),
            })?;
    apply_failure_policy(outcome, failure_policy)
}

fn apply_failure_policy(
    outcome: Result<String, ExtractionError>,
    failure_policy: ExtractionFailurePolicy,
) -> Result<String, ProcessingError> {
    match (outcome, failure_policy) {
        (Ok(text), _) => Ok(text),
        (Err(error), ExtractionFailurePolicy::Embed) => {
            tracing::warn!(%error, "Continuing with extraction failure message as text");
            Ok(error.to_string())
        }
        (Err(error), ExtractionFailurePolicy::Abort) => Err(ProcessingError::Stage {
            stage: Stage::Extract,
            detail: error.to_string(),
        }),
    }
}

async fn ensure_exists(path: &Path, file_path: &str) -> Result<(), ProcessingError> {
    match tokio::fs::try_exists(path).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(ProcessingError::NotFound {
            path: file_path.to_string(),
        }),
        Err(err) => {
            tracing::warn!(path = file_path, error = %err, "Could not check file existence");
            Err(ProcessingError::NotFound {
                path: file_path.to_string(),
            })
        }
    }
}

fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{PREVIEW_ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

#[async_trait]
impl ProcessingApi for ProcessingService {
    async fn submit_document(
        &self,
        request: DocumentRequest,
    ) -> Result<ProcessingResult, ProcessingError> {
        ProcessingService::submit_document(self, request).await
    }

    fn get_status(&self, document_id: DocumentId) -> Result<ProcessingStatus, ProcessingError> {
        ProcessingService::get_status(self, document_id)
    }

    async fn extract_text(
        &self,
        file_path: &str,
        format_hint: Option<&str>,
    ) -> Result<String, ProcessingError> {
        ProcessingService::extract_text(self, file_path, format_hint).await
    }

    fn summarize(&self, text: &str, max_length: Option<usize>) -> String {
        ProcessingService::summarize(self, text, max_length)
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        ProcessingService::metrics_snapshot(self)
    }
}
