use crate::tool::{Tool, ToolDefinition};
use crate::tools::{AnalyzeLogsTool, ProjectStatusTool, QueryDbTool};
use indexmap::IndexMap;
use intellacc_core::Config;
use std::sync::Arc;

/// Catalog of available tools, kept in registration order.
///
/// Built once at startup and shared read-only afterwards.
pub struct ToolRegistry {
    tools: IndexMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: IndexMap::new(),
        }
    }

    /// The gateway's fixed catalog: `query_db`, `get_project_status`,
    /// `analyze_logs`, in that order.
    pub fn with_defaults(config: &Config) -> Self {
        let mut registry = Self::new();
        let tools: [Arc<dyn Tool>; 3] = [
            Arc::new(QueryDbTool::new(config.docker.clone(), config.database.clone())),
            Arc::new(ProjectStatusTool::new(config.docker.clone(), config.project.clone())),
            Arc::new(AnalyzeLogsTool::new(config.docker.clone(), config.logs.clone())),
        ];
        for tool in tools {
            let name = tool.definition().name;
            registry.tools.insert(name, tool);
        }
        registry
    }

    /// Register a tool. Returns error if name already registered.
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<(), RegistryError> {
        let def = tool.definition();
        if self.tools.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        self.tools.insert(def.name, Arc::new(tool));
        Ok(())
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List all registered tool definitions, in registration order.
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Tool with name '{0}' is already registered")]
    DuplicateName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(registry: &ToolRegistry) -> Vec<String> {
        registry.list().into_iter().map(|d| d.name).collect()
    }

    #[test]
    fn test_defaults_in_order() {
        let registry = ToolRegistry::with_defaults(&Config::default());
        assert_eq!(registry.len(), 3);
        assert_eq!(
            names(&registry),
            vec!["query_db", "get_project_status", "analyze_logs"]
        );
        assert!(registry.contains("analyze_logs"));
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_list_is_idempotent() {
        let registry = ToolRegistry::with_defaults(&Config::default());
        let first = registry.list();
        let second = registry.list();
        assert_eq!(first, second);
        assert_eq!(second.len(), 3);
    }

    #[test]
    fn test_duplicate_registration() {
        let config = Config::default();
        let mut registry = ToolRegistry::with_defaults(&config);
        let dup = QueryDbTool::new(config.docker.clone(), config.database.clone());
        assert!(matches!(
            registry.register(dup),
            Err(RegistryError::DuplicateName(name)) if name == "query_db"
        ));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_empty_registry() {
        let registry = ToolRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.list().is_empty());
    }
}
