//! MCP server entrypoint (stdio transport).
//!
//! Launches an MCP server that exposes the document pipeline's tools and resources over stdio.
//! This mode is designed for editor/agent integrations and shares all runtime configuration with
//! the HTTP binary. Logs go to the log file only, since stdout carries the protocol.
use anyhow::{Context, Result};
use docproc::{config, logging, mcp::DocprocMcpServer, processing::ProcessingService};
use rmcp::{service::ServiceExt, transport::stdio};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    config::init_config();
    logging::init_file_tracing();

    let settings = config::get_config().pipeline_settings();
    let processing = Arc::new(ProcessingService::new(settings));
    let server = DocprocMcpServer::new(processing);

    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server over stdio")?;

    service
        .waiting()
        .await
        .context("MCP server terminated unexpectedly")?;

    Ok(())
}
