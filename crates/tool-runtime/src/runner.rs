//! External command execution.
//!
//! Tools never spawn processes directly; they go through a [`CommandRunner`]
//! so tests can substitute a stub for the container runtime.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Exit status and captured output of a finished external process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or -1 when the process was terminated by a signal.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs a program with an argument vector and captures its output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput>;
}

/// Runs commands as real child processes. No shell, no timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        debug!(program = program, args = ?args, "spawning external command");

        let output = Command::new(program)
            .args(args)
            .stdin(std::process::Stdio::null())
            .output()
            .await?;

        let exit_code = output.status.code().unwrap_or(-1);
        debug!(program = program, exit_code = exit_code, "external command finished");

        Ok(CommandOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Stub runner for tests: replays canned outcomes and records every argv.
#[cfg(any(test, feature = "test-utils"))]
pub mod stub {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    enum Canned {
        Output(CommandOutput),
        SpawnError(std::io::ErrorKind, String),
    }

    /// A runner that returns pre-configured outcomes in FIFO order.
    ///
    /// When the queue is empty it answers with a successful, empty output.
    #[derive(Default)]
    pub struct StubRunner {
        outcomes: Mutex<VecDeque<Canned>>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl StubRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue an outcome for the next call.
        pub fn queue_output(&self, exit_code: i32, stdout: &str, stderr: &str) -> &Self {
            self.outcomes
                .lock()
                .unwrap()
                .push_back(Canned::Output(CommandOutput {
                    exit_code,
                    stdout: stdout.to_string(),
                    stderr: stderr.to_string(),
                }));
            self
        }

        /// Queue a failure to spawn (e.g. the program is not installed).
        pub fn queue_spawn_error(&self, message: &str) -> &Self {
            self.outcomes.lock().unwrap().push_back(Canned::SpawnError(
                std::io::ErrorKind::NotFound,
                message.to_string(),
            ));
            self
        }

        /// Every argv received so far, program first.
        pub fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CommandRunner for StubRunner {
        async fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
            let mut argv = Vec::with_capacity(args.len() + 1);
            argv.push(program.to_string());
            argv.extend(args.iter().cloned());
            self.calls.lock().unwrap().push(argv);

            match self.outcomes.lock().unwrap().pop_front() {
                Some(Canned::Output(output)) => Ok(output),
                Some(Canned::SpawnError(kind, msg)) => Err(std::io::Error::new(kind, msg)),
                None => Ok(CommandOutput::default()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::stub::StubRunner;
    use super::*;

    #[tokio::test]
    async fn test_process_runner_captures_stdout() {
        let output = ProcessRunner
            .run("echo", &["hello".to_string()])
            .await
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_process_runner_nonzero_exit() {
        let output = ProcessRunner
            .run("sh", &["-c".to_string(), "echo oops >&2; exit 3".to_string()])
            .await
            .unwrap();
        assert!(!output.success());
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn test_process_runner_missing_program() {
        let err = ProcessRunner
            .run("definitely-not-a-real-binary-xyz", &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_stub_runner_replays_in_order() {
        let stub = StubRunner::new();
        stub.queue_output(0, "first", "").queue_output(2, "", "second");

        let a = stub.run("docker", &["ps".to_string()]).await.unwrap();
        let b = stub.run("docker", &["logs".to_string()]).await.unwrap();
        let c = stub.run("docker", &[]).await.unwrap();

        assert_eq!(a.stdout, "first");
        assert_eq!(b.exit_code, 2);
        assert_eq!(c, CommandOutput::default());
        assert_eq!(stub.call_count(), 3);
        assert_eq!(stub.calls()[0], vec!["docker", "ps"]);
    }
}
