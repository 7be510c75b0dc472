//! Tail a service container's logs and summarize its health.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use intellacc_core::config::{DockerConfig, LogsConfig};
use intellacc_core::Service;

use crate::tool::{Tool, ToolContext, ToolDefinition, ToolError};

pub struct AnalyzeLogsTool {
    docker: DockerConfig,
    logs: LogsConfig,
}

impl AnalyzeLogsTool {
    pub fn new(docker: DockerConfig, logs: LogsConfig) -> Self {
        Self { docker, logs }
    }

    /// The raw `service` argument as text. Non-string values are kept so an
    /// unrecognised value is reported as an unknown service.
    fn service_name(input: &Value) -> Result<String, ToolError> {
        match input.get("service") {
            None | Some(Value::Null) => Err(ToolError::InvalidInput(
                "missing 'service' field".to_string(),
            )),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Ok(other.to_string()),
        }
    }

    /// `lines` may arrive as a JSON integer or a numeric string.
    fn parse_lines(&self, input: &Value) -> Result<u64, ToolError> {
        match input.get("lines") {
            None | Some(Value::Null) => Ok(u64::from(self.logs.default_lines)),
            Some(Value::Number(n)) => n.as_u64().ok_or_else(|| {
                ToolError::InvalidInput(format!("'lines' must be a non-negative integer, got {n}"))
            }),
            Some(Value::String(s)) => s.trim().parse().map_err(|_| {
                ToolError::InvalidInput(format!("'lines' must be a non-negative integer, got \"{s}\""))
            }),
            Some(other) => Err(ToolError::InvalidInput(format!(
                "'lines' must be a non-negative integer, got {other}"
            ))),
        }
    }
}

#[async_trait]
impl Tool for AnalyzeLogsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "analyze_logs".to_string(),
            description: "Analyze application logs for errors or patterns".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "service": {
                        "type": "string",
                        "description": format!(
                            "Service to analyze ({})",
                            Service::names().join(", ")
                        ),
                        "enum": Service::names()
                    },
                    "lines": {
                        "type": "integer",
                        "description": "Number of log lines to analyze",
                        "default": self.logs.default_lines
                    }
                },
                "required": ["service"]
            }),
        }
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<String, ToolError> {
        let service_name = Self::service_name(&input)?;
        let (service, container) = self.logs.services.resolve(&service_name)?;
        let lines = self.parse_lines(&input)?;

        debug!(service = %service, container = container, lines = lines, "fetching logs");

        let args = vec![
            "logs".to_string(),
            "--tail".to_string(),
            lines.to_string(),
            container.to_string(),
        ];
        let output = context
            .runner
            .run(&self.docker.bin, &args)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        // Health comes from docker's exit status only, never from log content.
        let status = if output.success() { "Healthy" } else { "Issues detected" };
        let errors = if output.stderr.is_empty() {
            "No errors"
        } else {
            output.stderr.as_str()
        };

        Ok(format!(
            "\n# Log Analysis for {service}\n\n\
             ## Recent Logs ({lines} lines)\n{stdout}\n\n\
             ## Error Output\n{errors}\n\n\
             ## Analysis\n\
             - Container: {container}\n\
             - Lines analyzed: {lines}\n\
             - Status: {status}\n",
            stdout = output.stdout,
        ))
    }

    fn render_error(&self, err: &ToolError) -> String {
        match err {
            ToolError::UnknownService(_) => err.to_string(),
            other => format!("Error analyzing logs: {}", other.detail()),
        }
    }
}
