//! HTTP surface for docproc.
//!
//! This module exposes a compact Axum router:
//!
//! - `GET /` – Service banner plus the endpoint catalog.
//! - `GET /health` – Liveness check.
//! - `POST /process-document` – Run the full pipeline for `{documentId, filePath, options?}` and
//!   return the `ProcessingResult`.
//! - `GET /status/:document_id` – Latest `ProcessingStatus` for a document.
//! - `POST /extract-text` – Extract text from `{filePath, documentType?}` without status tracking.
//! - `POST /summarize` – Summarize `{text, maxLength?}`.
//! - `GET /metrics` – Pipeline counters.
//!
//! The HTTP surface shares the same processing pipeline with the MCP server, so behavior is
//! identical across interfaces.

use crate::processing::{DocumentRequest, ProcessingApi, ProcessingError, ProcessingResult};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

const SERVICE_NAME: &str = "docproc";

/// Build the HTTP router exposing the processing API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: ProcessingApi + 'static,
{
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/process-document", post(process_document::<S>))
        .route("/status/:document_id", get(get_status::<S>))
        .route("/extract-text", post(extract_text::<S>))
        .route("/summarize", post(summarize::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .with_state(service)
}

/// Descriptor for a single endpoint in the discovery catalog.
#[derive(Serialize)]
struct EndpointDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
}

/// Response body for `GET /`.
#[derive(Serialize)]
struct RootResponse {
    message: &'static str,
    version: &'static str,
    status: &'static str,
    endpoints: Vec<EndpointDescriptor>,
}

/// Service banner with the endpoint catalog for discovery by tools and hosts.
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "docproc document processing API",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        endpoints: vec![
            EndpointDescriptor {
                name: "health",
                method: "GET",
                path: "/health",
                description: "Liveness check.",
            },
            EndpointDescriptor {
                name: "process",
                method: "POST",
                path: "/process-document",
                description: "Extract text, metadata, summary, and keywords for a file; progress is observable via /status.",
            },
            EndpointDescriptor {
                name: "status",
                method: "GET",
                path: "/status/{documentId}",
                description: "Latest processing status for a document.",
            },
            EndpointDescriptor {
                name: "extract",
                method: "POST",
                path: "/extract-text",
                description: "Extract text from a file without tracking status.",
            },
            EndpointDescriptor {
                name: "summarize",
                method: "POST",
                path: "/summarize",
                description: "Extractive summary of the supplied text.",
            },
            EndpointDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Counters of started, completed, and failed runs.",
            },
        ],
    })
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Run the full pipeline for one document.
///
/// The call returns once the run is terminal; concurrent callers can poll `/status/:id` while
/// it executes.
async fn process_document<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<DocumentRequest>,
) -> Result<Json<ProcessingResult>, AppError>
where
    S: ProcessingApi,
{
    if request.file_path.trim().is_empty() {
        return Err(ProcessingError::Validation("`filePath` must not be empty".into()).into());
    }
    let document_id = request.document_id;
    let result = service.submit_document(request).await?;
    tracing::info!(
        document_id,
        text_length = result.text_length,
        "Process request completed"
    );
    Ok(Json(result))
}

async fn get_status<S>(
    State(service): State<Arc<S>>,
    Path(document_id): Path<u64>,
) -> Result<Response, AppError>
where
    S: ProcessingApi,
{
    let status = service.get_status(document_id)?;
    Ok(Json(status).into_response())
}

/// Request body for `POST /extract-text`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractTextRequest {
    /// Path of the file to read.
    file_path: String,
    /// Optional format hint; the file extension takes precedence.
    #[serde(default)]
    document_type: Option<String>,
}

/// Response body for `POST /extract-text`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtractTextResponse {
    file_path: String,
    extracted_text: String,
    text_length: usize,
    success: bool,
}

async fn extract_text<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<ExtractTextRequest>,
) -> Result<Json<ExtractTextResponse>, AppError>
where
    S: ProcessingApi,
{
    let ExtractTextRequest {
        file_path,
        document_type,
    } = request;
    let extracted_text = service
        .extract_text(&file_path, document_type.as_deref())
        .await?;
    Ok(Json(ExtractTextResponse {
        text_length: extracted_text.chars().count(),
        file_path,
        extracted_text,
        success: true,
    }))
}

/// Request body for `POST /summarize`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummarizeRequest {
    text: String,
    #[serde(default)]
    max_length: Option<usize>,
}

/// Response body for `POST /summarize`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummarizeResponse {
    original_length: usize,
    summary: String,
    summary_length: usize,
    success: bool,
}

async fn summarize<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, AppError>
where
    S: ProcessingApi,
{
    if request.max_length == Some(0) {
        return Err(ProcessingError::Validation("`maxLength` must be positive".into()).into());
    }
    let summary = service.summarize(&request.text, request.max_length);
    Ok(Json(SummarizeResponse {
        original_length: request.text.chars().count(),
        summary_length: summary.chars().count(),
        summary,
        success: true,
    }))
}

async fn get_metrics<S>(State(service): State<Arc<S>>) -> Response
where
    S: ProcessingApi,
{
    Json(service.metrics_snapshot()).into_response()
}

struct AppError(ProcessingError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ProcessingError::NotFound { .. } | ProcessingError::StatusNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ProcessingError::InFlight(_) => StatusCode::CONFLICT,
            ProcessingError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ProcessingError::Stage { .. } | ProcessingError::Interrupted(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl From<ProcessingError> for AppError {
    fn from(inner: ProcessingError) -> Self {
        Self(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::create_router;
    use crate::metrics::MetricsSnapshot;
    use crate::processing::{
        DocumentId, DocumentRequest, Metadata, ProcessingApi, ProcessingError, ProcessingResult,
        ProcessingStatus, RunState,
    };
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Clone, Default)]
    struct StubProcessingService {
        requests: Arc<Mutex<Vec<DocumentRequest>>>,
    }

    impl StubProcessingService {
        async fn recorded_requests(&self) -> Vec<DocumentRequest> {
            self.requests.lock().await.clone()
        }
    }

    fn stub_result(document_id: DocumentId) -> ProcessingResult {
        ProcessingResult {
            document_id,
            extracted_text_preview: "Body".into(),
            text_length: 4,
            summary: "Body".into(),
            metadata: Metadata {
                file_size_bytes: 4,
                word_count: 1,
                character_count: 4,
                line_count: 1,
                file_extension: ".txt".into(),
                file_name: "doc.txt".into(),
            },
            keywords: vec!["body".into()],
            processed_at: "2025-01-01T00:00:00Z".into(),
        }
    }

    #[async_trait]
    impl ProcessingApi for StubProcessingService {
        async fn submit_document(
            &self,
            request: DocumentRequest,
        ) -> Result<ProcessingResult, ProcessingError> {
            let document_id = request.document_id;
            let missing = request.file_path.contains("missing");
            self.requests.lock().await.push(request);
            if missing {
                return Err(ProcessingError::NotFound {
                    path: "missing.txt".into(),
                });
            }
            Ok(stub_result(document_id))
        }

        fn get_status(
            &self,
            document_id: DocumentId,
        ) -> Result<ProcessingStatus, ProcessingError> {
            match document_id {
                1 => Ok(ProcessingStatus {
                    document_id,
                    status: RunState::Processing,
                    progress: 50,
                    message: "Analyzing content".into(),
                    result: None,
                    updated_at: "2025-01-01T00:00:00Z".into(),
                }),
                2 => Err(ProcessingError::InFlight(2)),
                other => Err(ProcessingError::StatusNotFound(other)),
            }
        }

        async fn extract_text(
            &self,
            file_path: &str,
            _format_hint: Option<&str>,
        ) -> Result<String, ProcessingError> {
            Ok(format!("text of {file_path}"))
        }

        fn summarize(&self, text: &str, max_length: Option<usize>) -> String {
            text.chars().take(max_length.unwrap_or(200)).collect()
        }

        fn metrics_snapshot(&self) -> MetricsSnapshot {
            MetricsSnapshot {
                runs_started: 3,
                ..MetricsSnapshot::default()
            }
        }
    }

    async fn send(
        service: Arc<StubProcessingService>,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let app = create_router(service);
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |value| Body::from(value.to_string())))
            .expect("request");
        let response = app.oneshot(request).await.expect("router response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn root_lists_endpoints() {
        let (status, json) = send(Arc::default(), Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        let paths: Vec<_> = json["endpoints"]
            .as_array()
            .expect("endpoints")
            .iter()
            .filter_map(|endpoint| endpoint["path"].as_str())
            .collect();
        assert!(paths.contains(&"/process-document"));
        assert!(paths.contains(&"/summarize"));
    }

    #[tokio::test]
    async fn process_route_forwards_camel_case_request() {
        let service = Arc::new(StubProcessingService::default());
        let payload = json!({
            "documentId": 42,
            "filePath": "/data/doc.txt",
            "options": { "maxLength": 120 }
        });
        let (status, json) =
            send(service.clone(), Method::POST, "/process-document", Some(payload)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["documentId"], 42);
        assert_eq!(json["metadata"]["fileName"], "doc.txt");
        assert_eq!(json["keywords"][0], "body");

        let requests = service.recorded_requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].file_path, "/data/doc.txt");
        assert_eq!(requests[0].options["maxLength"], 120);
    }

    #[tokio::test]
    async fn process_route_maps_missing_file_to_404() {
        let payload = json!({ "documentId": 7, "filePath": "/data/missing.txt" });
        let (status, json) =
            send(Arc::default(), Method::POST, "/process-document", Some(payload)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().expect("error").contains("File not found"));
    }

    #[tokio::test]
    async fn process_route_rejects_empty_path() {
        let payload = json!({ "documentId": 7, "filePath": "  " });
        let service = Arc::new(StubProcessingService::default());
        let (status, _) =
            send(service.clone(), Method::POST, "/process-document", Some(payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(service.recorded_requests().await.is_empty());
    }

    #[tokio::test]
    async fn status_route_maps_tracker_outcomes() {
        let (status, json) = send(Arc::default(), Method::GET, "/status/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "processing");
        assert_eq!(json["progress"], 50);

        let (status, _) = send(Arc::default(), Method::GET, "/status/2", None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(Arc::default(), Method::GET, "/status/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn extract_and_summarize_routes_report_lengths() {
        let (status, json) = send(
            Arc::default(),
            Method::POST,
            "/extract-text",
            Some(json!({ "filePath": "a.pdf", "documentType": "pdf" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["extractedText"], "text of a.pdf");
        assert_eq!(json["textLength"], 13);
        assert_eq!(json["success"], true);

        let (status, json) = send(
            Arc::default(),
            Method::POST,
            "/summarize",
            Some(json!({ "text": "abcdef", "maxLength": 4 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["originalLength"], 6);
        assert_eq!(json["summaryLength"], 4);
    }

    #[tokio::test]
    async fn metrics_route_serializes_snapshot() {
        let (status, json) = send(Arc::default(), Method::GET, "/metrics", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["runsStarted"], 3);
        assert_eq!(json["runsFailed"], 0);
    }
}
