//! Model Context Protocol (MCP) integration for docproc.
//!
//! This module wires the processing pipeline into an MCP server so editors and agent hosts can
//! process documents over stdio. The surface area consists of:
//!
//! - Tools: `process-document`, `get-status`, `extract-text`, `summarize`, and `metrics`.
//! - Resources: `mcp://formats` (recognized file extensions) and `mcp://settings` (effective
//!   pipeline defaults).
//!
//! Handlers, schemas, and formatting helpers are kept in focused submodules to make tests and
//! reviews small and targeted.

mod format;
pub mod handlers;
mod registry;
mod schemas;
mod server;

pub use server::DocprocMcpServer;
