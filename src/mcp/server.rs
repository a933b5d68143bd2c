//! MCP server bootstrap and request dispatch.

use std::{borrow::Cow, sync::Arc};

use crate::{
    mcp::{
        format::{FormatsSnapshot, SettingsSnapshot, json_resource_contents, serialize_json},
        handlers::{
            extract::handle_extract_text, metrics::handle_metrics,
            process::handle_process_document, status::handle_get_status,
            summarize::handle_summarize,
        },
        registry, schemas,
    },
    processing::ProcessingService,
};
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::{
        AnnotateAble, CallToolRequestParam, CallToolResult, ListResourcesResult, ListToolsResult,
        RawResource, ReadResourceRequestParam, ReadResourceResult, Resource, ServerCapabilities,
        ServerInfo, Tool, ToolAnnotations,
    },
};

const FORMATS_URI: &str = "mcp://formats";
const SETTINGS_URI: &str = "mcp://settings";

/// MCP server implementation exposing the document processing pipeline.
#[derive(Clone)]
pub struct DocprocMcpServer {
    processing: Arc<ProcessingService>,
    registry: Arc<registry::Registry>,
}

impl DocprocMcpServer {
    /// Create a new MCP server using the supplied processing pipeline.
    pub fn new(processing: Arc<ProcessingService>) -> Self {
        let mut registry = registry::Registry::default();
        registry.register_resource(FORMATS_URI, resource_formats);
        registry.register_resource(SETTINGS_URI, resource_settings);

        registry.register_tool("process-document", tool_process_document);
        registry.register_tool("get-status", tool_get_status);
        registry.register_tool("extract-text", tool_extract_text);
        registry.register_tool("summarize", tool_summarize);
        registry.register_tool("metrics", tool_metrics);

        Self {
            processing,
            registry: Arc::new(registry),
        }
    }

    fn describe_tools(&self) -> Vec<Tool> {
        let settings = self.processing.settings();
        vec![
            Tool {
                name: Cow::Borrowed("process-document"),
                title: Some("Process Document".to_string()),
                description: Some(Cow::Borrowed(
                    "Extract text from a PDF, Word, spreadsheet, or text file and return metadata, a summary, and keywords.",
                )),
                input_schema: Arc::new(schemas::process_document_input_schema(settings)),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Process Document")
                        .destructive(false)
                        .idempotent(true)
                        .open_world(false),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("get-status"),
                title: Some("Processing Status".to_string()),
                description: Some(Cow::Borrowed(
                    "Check progress of a submitted document; the result is attached once completed.",
                )),
                input_schema: Arc::new(schemas::get_status_input_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Processing Status")
                        .read_only(true)
                        .idempotent(true)
                        .open_world(false),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("extract-text"),
                title: Some("Extract Text".to_string()),
                description: Some(Cow::Borrowed(
                    "Read the raw text of a document without summarizing or tracking status.",
                )),
                input_schema: Arc::new(schemas::extract_text_input_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Extract Text")
                        .read_only(true)
                        .idempotent(true)
                        .open_world(false),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("summarize"),
                title: Some("Summarize Text".to_string()),
                description: Some(Cow::Borrowed(
                    "Build an extractive summary from the leading sentences of the supplied text.",
                )),
                input_schema: Arc::new(schemas::summarize_input_schema(settings)),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Summarize Text")
                        .read_only(true)
                        .idempotent(true)
                        .open_world(false),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("metrics"),
                title: Some("Metrics Snapshot".to_string()),
                description: Some(Cow::Borrowed(
                    "Check how many runs started, completed, and failed.",
                )),
                input_schema: Arc::new(schemas::empty_object_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Metrics Snapshot")
                        .read_only(true)
                        .idempotent(true)
                        .open_world(false),
                ),
                icons: None,
            },
        ]
    }

    fn describe_resources(&self) -> Vec<Resource> {
        let mut formats = RawResource::new(FORMATS_URI, "formats");
        formats.description = Some("Recognized document formats and their extensions".into());

        let mut settings = RawResource::new(SETTINGS_URI, "settings");
        settings.description = Some("Effective pipeline defaults and policies".into());

        vec![formats.no_annotation(), settings.no_annotation()]
    }
}

fn resource_formats(
    _server: &DocprocMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    Box::pin(async move {
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(
                FORMATS_URI,
                serialize_json(&FormatsSnapshot::current(), FORMATS_URI),
            )],
        })
    })
}

fn resource_settings(
    server: &DocprocMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    let payload = SettingsSnapshot::from(server.processing.settings());
    Box::pin(async move {
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(
                SETTINGS_URI,
                serialize_json(&payload, SETTINGS_URI),
            )],
        })
    })
}

fn tool_process_document(
    server: &DocprocMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let processing = server.processing.clone();
    Box::pin(async move { handle_process_document(&processing, request.arguments).await })
}

fn tool_get_status(
    server: &DocprocMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let processing = server.processing.clone();
    Box::pin(async move { handle_get_status(&processing, request.arguments).await })
}

fn tool_extract_text(
    server: &DocprocMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let processing = server.processing.clone();
    Box::pin(async move { handle_extract_text(&processing, request.arguments).await })
}

fn tool_summarize(
    server: &DocprocMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let processing = server.processing.clone();
    Box::pin(async move { handle_summarize(&processing, request.arguments).await })
}

fn tool_metrics(
    server: &DocprocMcpServer,
    _request: CallToolRequestParam,
) -> registry::ToolFuture {
    let processing = server.processing.clone();
    Box::pin(async move { handle_metrics(&processing).await })
}

impl ServerHandler for DocprocMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut implementation = rmcp::model::Implementation::from_build_env();
        implementation.name = "docproc".to_string();
        implementation.title = Some("Document Processing MCP".to_string());
        implementation.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: implementation,
            instructions: Some(
                "Use this server to read documents on the host filesystem. Call process-document with a documentId and filePath to get extracted text, metadata, a summary, and keywords; poll get-status with the same documentId for progress.".into(),
            ),
            ..ServerInfo::default()
        }
    }

    fn list_resources(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        let resources = self.describe_resources();
        std::future::ready(Ok(ListResourcesResult::with_all_items(resources)))
    }

    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools = self.describe_tools();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            if let Some(handler) = self.registry.resource(request.uri.as_str()) {
                return handler(self, request).await;
            }

            Err(McpError::resource_not_found(
                format!("Unknown resource URI: {}", request.uri),
                None,
            ))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            if let Some(handler) = self.registry.tool(request.name.as_ref()) {
                return handler(self, request).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown tool: {}", request.name),
                None,
            ))
        }
    }
}
