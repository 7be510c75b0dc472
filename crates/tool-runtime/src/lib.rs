pub mod dispatcher;
pub mod registry;
pub mod runner;
pub mod tool;
pub mod tools;

pub use dispatcher::{Dispatcher, ExecutionResult};
pub use registry::{RegistryError, ToolRegistry};
pub use runner::{CommandOutput, CommandRunner, ProcessRunner};
pub use tool::{Tool, ToolContext, ToolDefinition, ToolError};
pub use tools::{AnalyzeLogsTool, ProjectStatusTool, QueryDbTool};
