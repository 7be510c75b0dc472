use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tool gateway for the Intellacc container stack.
///
/// Serves `query_db`, `get_project_status` and `analyze_logs` to MCP
/// clients over stdio, or runs a single tool call from the shell.
#[derive(Parser, Debug)]
#[command(name = "intellacc-gateway", version, about)]
pub struct CliArgs {
    /// Env file to load before reading configuration (default: ./.env)
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Configuration profile; keys are looked up as {PROFILE}_{KEY} first
    #[arg(long, global = true, env = "INTELLACC_PROFILE")]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve MCP over stdin/stdout (the default)
    Serve,
    /// Print the tool catalog as JSON
    ListTools,
    /// Run one tool and print its text result
    Call {
        /// Tool name, e.g. query_db
        tool: String,
        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

impl CliArgs {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let args = CliArgs::try_parse_from(["intellacc-gateway"]).unwrap();
        assert_eq!(args.command(), Command::Serve);
        assert!(args.env_file.is_none());
    }

    #[test]
    fn test_call_with_args() {
        let args = CliArgs::try_parse_from([
            "intellacc-gateway",
            "call",
            "analyze_logs",
            "--args",
            r#"{"service":"backend"}"#,
        ])
        .unwrap();
        assert_eq!(
            args.command(),
            Command::Call {
                tool: "analyze_logs".to_string(),
                args: r#"{"service":"backend"}"#.to_string(),
            }
        );
    }

    #[test]
    fn test_global_env_file_after_subcommand() {
        let args =
            CliArgs::try_parse_from(["intellacc-gateway", "list-tools", "--env-file", "prod.env"])
                .unwrap();
        assert_eq!(args.command(), Command::ListTools);
        assert_eq!(args.env_file, Some(PathBuf::from("prod.env")));
    }
}
