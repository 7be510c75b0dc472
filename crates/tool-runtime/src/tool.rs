use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::runner::CommandRunner;

/// Describes a tool's interface for MCP clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name (e.g., "query_db", "analyze_logs")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON Schema describing the expected input
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Names listed in the schema's `required` array.
    pub fn required_args(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }
}

impl fmt::Display for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.description)
    }
}

/// Context passed to tool execution.
#[derive(Clone)]
pub struct ToolContext {
    /// Spawns the external commands tools depend on.
    pub runner: Arc<dyn CommandRunner>,
}

impl ToolContext {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

/// Every tool exposed by the gateway implements this trait.
///
/// Tools are object-safe, Send + Sync, and async. `execute` reports failures
/// as a structured [`ToolError`]; `render_error` turns that error into the
/// text the caller sees.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool's definition (name, description, JSON Schema).
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given JSON input, returning the result text.
    async fn execute(&self, input: Value, context: &ToolContext) -> Result<String, ToolError>;

    /// Text reported to the caller when `execute` fails.
    fn render_error(&self, err: &ToolError) -> String {
        err.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Unknown service: {0}")]
    UnknownService(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The external process ran and exited non-zero.
    #[error("Command failed (exit code {exit_code}):\n{stderr}")]
    CommandFailed { exit_code: i32, stderr: String },
    /// The external process could not be run, or a file could not be read.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl ToolError {
    /// The bare detail without the variant's label, used by tools that
    /// prepend their own prefix.
    pub fn detail(&self) -> String {
        match self {
            ToolError::UnknownTool(s)
            | ToolError::UnknownService(s)
            | ToolError::InvalidInput(s)
            | ToolError::ExecutionFailed(s) => s.clone(),
            ToolError::CommandFailed { stderr, .. } => stderr.clone(),
        }
    }
}

impl From<intellacc_core::CoreError> for ToolError {
    fn from(err: intellacc_core::CoreError) -> Self {
        match err {
            intellacc_core::CoreError::UnknownService(s) => ToolError::UnknownService(s),
        }
    }
}

/// Read an optional string argument. Absent and `null` both yield `None`.
pub(crate) fn optional_str<'a>(input: &'a Value, key: &str) -> Result<Option<&'a str>, ToolError> {
    match input.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(ToolError::InvalidInput(format!(
            "'{key}' must be a string, got {other}"
        ))),
    }
}

/// Read a required string argument.
pub(crate) fn required_str<'a>(input: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    optional_str(input, key)?
        .ok_or_else(|| ToolError::InvalidInput(format!("missing '{key}' field")))
}
