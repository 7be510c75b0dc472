//! The gateway's tools. Each proxies one administrative action against the
//! running containers through the context's command runner.

pub mod analyze_logs;
pub mod project_status;
pub mod query_db;

pub use analyze_logs::AnalyzeLogsTool;
pub use project_status::ProjectStatusTool;
pub use query_db::QueryDbTool;
