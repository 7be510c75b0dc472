mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use intellacc_core::config::{load_dotenv, load_dotenv_from, Config};
use intellacc_mcp::{McpServer, StdioTransport, ToolInfo};
use intellacc_tool_runtime::{Dispatcher, ProcessRunner, ToolContext, ToolRegistry};

use crate::cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    match &args.env_file {
        Some(path) => load_dotenv_from(path),
        None => load_dotenv(),
    }
    let config = match &args.profile {
        Some(profile) => Config::for_profile(profile),
        None => Config::from_env(),
    };
    config.log_summary();

    let registry = Arc::new(ToolRegistry::with_defaults(&config));
    let dispatcher = Dispatcher::new(registry, ToolContext::new(Arc::new(ProcessRunner)));

    match args.command() {
        Command::Serve => {
            let mut server = McpServer::new(dispatcher);
            let mut transport = StdioTransport::stdio();
            server
                .run(&mut transport)
                .await
                .context("MCP server loop failed")?;
        }
        Command::ListTools => {
            let tools: Vec<ToolInfo> = dispatcher
                .registry()
                .list()
                .into_iter()
                .map(ToolInfo::from)
                .collect();
            println!("{}", serde_json::to_string_pretty(&tools)?);
        }
        Command::Call { tool, args } => {
            let arguments: serde_json::Value = serde_json::from_str(&args)
                .with_context(|| format!("--args is not valid JSON: {args}"))?;
            info!(tool = %tool, "running single tool call");
            let result = dispatcher.dispatch(&tool, arguments).await;
            println!("{}", result.text);
        }
    }

    Ok(())
}
