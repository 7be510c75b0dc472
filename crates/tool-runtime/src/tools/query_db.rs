//! SQL execution against the PostgreSQL container via `psql`.
//!
//! The query text is passed through verbatim; callers are trusted.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use intellacc_core::config::{DatabaseConfig, DockerConfig};

use crate::tool::{optional_str, required_str, Tool, ToolContext, ToolDefinition, ToolError};

pub struct QueryDbTool {
    docker: DockerConfig,
    database: DatabaseConfig,
}

impl QueryDbTool {
    pub fn new(docker: DockerConfig, database: DatabaseConfig) -> Self {
        Self { docker, database }
    }

    /// `docker exec <container> psql -U <user> -d <database> -c <query>`
    fn argv(&self, database: &str, query: &str) -> Vec<String> {
        vec![
            "exec".to_string(),
            self.database.container.clone(),
            "psql".to_string(),
            "-U".to_string(),
            self.database.user.clone(),
            "-d".to_string(),
            database.to_string(),
            "-c".to_string(),
            query.to_string(),
        ]
    }
}

#[async_trait]
impl Tool for QueryDbTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "query_db".to_string(),
            description: "Execute SQL queries on the Intellacc database".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "SQL query to execute"
                    },
                    "database": {
                        "type": "string",
                        "description": format!(
                            "Database name (default: {})",
                            self.database.default_database
                        ),
                        "default": self.database.default_database
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<String, ToolError> {
        let query = required_str(&input, "query")?;
        let database = optional_str(&input, "database")?
            .unwrap_or(self.database.default_database.as_str());

        debug!(
            container = %self.database.container,
            database = database,
            "running query"
        );

        let output = context
            .runner
            .run(&self.docker.bin, &self.argv(database, query))
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        if !output.success() {
            return Err(ToolError::CommandFailed {
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }

        Ok(format!("Query executed successfully:\n\n{}", output.stdout))
    }

    fn render_error(&self, err: &ToolError) -> String {
        match err {
            ToolError::CommandFailed { stderr, .. } => format!("Query failed:\n{stderr}"),
            other => format!("Error executing query: {}", other.detail()),
        }
    }
}
