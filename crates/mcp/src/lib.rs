//! MCP (Model Context Protocol) front end for the Intellacc tool gateway.
//!
//! Speaks JSON-RPC 2.0 over newline-delimited stdio and forwards
//! `tools/list` and `tools/call` to a [`Dispatcher`](intellacc_tool_runtime::Dispatcher).
//!
//! # Architecture
//!
//! - **types**: JSON-RPC 2.0 and MCP-specific protocol types
//! - **transport**: Line framing over stdio or any byte stream, plus in-memory channels
//! - **server**: Request loop and method handlers
//! - **error**: Protocol-level errors
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use intellacc_mcp::server::McpServer;
//! use intellacc_mcp::transport::StdioTransport;
//! use intellacc_tool_runtime::{Dispatcher, ProcessRunner, ToolContext, ToolRegistry};
//!
//! # async fn example(config: intellacc_core::Config) {
//! let registry = Arc::new(ToolRegistry::with_defaults(&config));
//! let dispatcher = Dispatcher::new(registry, ToolContext::new(Arc::new(ProcessRunner)));
//! let mut server = McpServer::new(dispatcher);
//! let mut transport = StdioTransport::stdio();
//! server.run(&mut transport).await.unwrap();
//! # }
//! ```

pub mod types;
pub mod transport;
pub mod server;
pub mod error;

pub use types::*;
pub use transport::{ChannelTransport, LineTransport, McpTransport, StdioTransport};
pub use server::McpServer;
pub use error::McpError;
