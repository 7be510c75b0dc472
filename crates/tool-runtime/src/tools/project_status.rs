//! Composed project status report: running containers plus static notes.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use intellacc_core::config::{DockerConfig, ProjectConfig};

use crate::tool::{Tool, ToolContext, ToolDefinition, ToolError};

const PS_FORMAT: &str = "table {{.Names}}\t{{.Status}}\t{{.Ports}}";

const RECENT_FEATURES: &str = "\
Key features implemented:
- LMSR automated market making system
- Kelly optimal betting suggestions with belief probability slider
- Real-time leaderboards showing actual RP balances
- Database cleanup and optimization
- Enhanced prediction UI with working sliders";

const ARCHITECTURE: &str = "\
- Frontend: VanJS (port 5173)
- Backend: Express.js (port 3000)
- Database: PostgreSQL (port 5432)
- Prediction Engine: Rust (port 3001)";

pub struct ProjectStatusTool {
    docker: DockerConfig,
    project: ProjectConfig,
}

impl ProjectStatusTool {
    pub fn new(docker: DockerConfig, project: ProjectConfig) -> Self {
        Self { docker, project }
    }

    fn render_report(&self, containers: &str) -> String {
        format!(
            "\n# Intellacc Project Status\n\n\
             ## Docker Containers\n{containers}\n\n\
             ## Recent Project Context\n{RECENT_FEATURES}\n\n\
             ## Current Working Directory\n{root}\n\n\
             ## Key Architecture\n{ARCHITECTURE}\n",
            root = self.project.root.display(),
        )
    }
}

#[async_trait]
impl Tool for ProjectStatusTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_project_status".to_string(),
            description: "Get current project status including todo items and recent changes"
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    async fn execute(&self, _input: Value, context: &ToolContext) -> Result<String, ToolError> {
        let path = &self.project.context_file;
        // Read for parity with the report's source document; the report
        // itself is built from the container table and static notes.
        let document = tokio::fs::read_to_string(path).await.map_err(|e| {
            ToolError::ExecutionFailed(format!("failed to read '{}': {e}", path.display()))
        })?;
        debug!(path = %path.display(), bytes = document.len(), "read project context");

        let args = vec!["ps".to_string(), "--format".to_string(), PS_FORMAT.to_string()];
        let output = context
            .runner
            .run(&self.docker.bin, &args)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        // A failing `docker ps` still yields a report, just with an empty table.
        if !output.success() {
            debug!(exit_code = output.exit_code, stderr = %output.stderr, "docker ps failed");
        }

        Ok(self.render_report(&output.stdout))
    }

    fn render_error(&self, err: &ToolError) -> String {
        format!("Error getting project status: {}", err.detail())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::stub::StubRunner;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn tool_in(dir: &std::path::Path) -> ProjectStatusTool {
        ProjectStatusTool::new(
            DockerConfig::default(),
            ProjectConfig {
                root: dir.to_path_buf(),
                context_file: dir.join("CLAUDE.md"),
            },
        )
    }

    #[tokio::test]
    async fn test_report_includes_container_table() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("CLAUDE.md"), "# Intellacc")
            .await
            .unwrap();

        let stub = Arc::new(StubRunner::new());
        stub.queue_output(0, "NAMES\tSTATUS\tPORTS\nintellacc_db\tUp 2 hours\t5432/tcp", "");
        let ctx = ToolContext::new(stub.clone());

        let tool = tool_in(dir.path());
        let report = tool.execute(serde_json::json!({}), &ctx).await.unwrap();

        assert!(report.starts_with("\n# Intellacc Project Status\n\n## Docker Containers\n"));
        assert!(report.contains("intellacc_db\tUp 2 hours\t5432/tcp"));
        assert!(report.contains("- LMSR automated market making system"));
        assert!(report.contains(&format!(
            "## Current Working Directory\n{}\n",
            dir.path().display()
        )));
        assert!(report.ends_with("- Prediction Engine: Rust (port 3001)\n"));

        assert_eq!(
            stub.calls(),
            vec![vec![
                "docker".to_string(),
                "ps".to_string(),
                "--format".to_string(),
                "table {{.Names}}\t{{.Status}}\t{{.Ports}}".to_string(),
            ]]
        );
    }

    #[tokio::test]
    async fn test_context_document_is_not_interpolated() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("CLAUDE.md"), "SECRET-MARKER")
            .await
            .unwrap();
        let ctx = ToolContext::new(Arc::new(StubRunner::new()));

        let report = tool_in(dir.path())
            .execute(serde_json::json!({}), &ctx)
            .await
            .unwrap();
        assert!(!report.contains("SECRET-MARKER"));
    }

    #[tokio::test]
    async fn test_missing_document_skips_docker() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubRunner::new());
        let ctx = ToolContext::new(stub.clone());
        let tool = tool_in(dir.path());

        let err = tool.execute(serde_json::json!({}), &ctx).await.unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed(_)));
        assert!(tool
            .render_error(&err)
            .starts_with("Error getting project status: failed to read"));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failing_docker_ps_still_reports() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("CLAUDE.md"), "x").await.unwrap();
        let stub = Arc::new(StubRunner::new());
        stub.queue_output(1, "", "Cannot connect to the Docker daemon");
        let ctx = ToolContext::new(stub.clone());

        let report = tool_in(dir.path())
            .execute(serde_json::json!({}), &ctx)
            .await
            .unwrap();

        assert!(report.contains("## Docker Containers\n\n\n## Recent Project Context\n"));
        assert!(!report.contains("Cannot connect"));
        assert!(report.ends_with("- Prediction Engine: Rust (port 3001)\n"));
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_docker_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("CLAUDE.md"), "x").await.unwrap();
        let stub = Arc::new(StubRunner::new());
        stub.queue_spawn_error("No such file or directory");
        let ctx = ToolContext::new(stub);
        let tool = tool_in(dir.path());

        let err = tool.execute(serde_json::json!({}), &ctx).await.unwrap_err();
        assert_eq!(
            tool.render_error(&err),
            "Error getting project status: No such file or directory"
        );
    }

    #[test]
    fn test_definition_has_no_inputs() {
        let tool = ProjectStatusTool::new(
            DockerConfig::default(),
            ProjectConfig {
                root: PathBuf::from("/srv"),
                context_file: PathBuf::from("/srv/CLAUDE.md"),
            },
        );
        let def = tool.definition();
        assert_eq!(def.name, "get_project_status");
        assert!(def.required_args().is_empty());
        assert_eq!(def.input_schema["properties"], serde_json::json!({}));
    }
}
