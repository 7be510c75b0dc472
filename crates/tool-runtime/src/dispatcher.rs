//! Resolves an invocation to a tool and always produces a text result.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::registry::ToolRegistry;
use crate::tool::{ToolContext, ToolError};

/// The single unit returned to the caller. Success and failure are both text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub text: String,
}

impl ExecutionResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Stateless dispatcher over a shared, read-only [`ToolRegistry`].
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    context: ToolContext,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>, context: ToolContext) -> Self {
        Self { registry, context }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run `tool_name` with `arguments` and render the outcome as text.
    ///
    /// Never fails: unknown tools, bad input, and execution faults all come
    /// back as descriptive text.
    pub async fn dispatch(&self, tool_name: &str, arguments: Value) -> ExecutionResult {
        match self.try_dispatch(tool_name, arguments).await {
            Ok(text) => ExecutionResult::new(text),
            Err(err) => ExecutionResult::new(match self.registry.get(tool_name) {
                Some(tool) => tool.render_error(&err),
                None => err.to_string(),
            }),
        }
    }

    /// Run `tool_name` and return the structured outcome.
    pub async fn try_dispatch(&self, tool_name: &str, arguments: Value) -> Result<String, ToolError> {
        let Some(tool) = self.registry.get(tool_name) else {
            warn!(tool = tool_name, "unknown tool requested");
            return Err(ToolError::UnknownTool(tool_name.to_string()));
        };

        let arguments = match arguments {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        if !arguments.is_object() {
            return Err(ToolError::InvalidInput(
                "arguments must be a JSON object".to_string(),
            ));
        }

        let definition = tool.definition();
        for key in definition.required_args() {
            if arguments.get(key).map_or(true, Value::is_null) {
                return Err(ToolError::InvalidInput(format!(
                    "missing required argument '{key}'"
                )));
            }
        }

        debug!(tool = tool_name, "dispatching tool call");
        let outcome = tool.execute(arguments, &self.context).await;
        match &outcome {
            Ok(text) => info!(tool = tool_name, bytes = text.len(), "tool call succeeded"),
            Err(e) => warn!(tool = tool_name, error = %e, "tool call failed"),
        }
        outcome
    }
}
