//! Message transport for the MCP server.
//!
//! Every message is one JSON object on one line. [`LineTransport`] frames
//! messages over any async byte stream; [`StdioTransport`] is that framing
//! on the process's stdin/stdout and is what the gateway serves on.
//! [`ChannelTransport`] skips framing altogether and hands whole messages to
//! an in-process peer.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tokio::sync::mpsc;

use crate::error::McpError;

#[async_trait]
pub trait McpTransport: Send + Sync {
    /// Next message, or `None` once the peer has gone away.
    async fn receive(&mut self) -> Result<Option<String>, McpError>;

    async fn send(&mut self, message: &str) -> Result<(), McpError>;
}

/// Newline-delimited messages over a reader/writer pair.
///
/// Surrounding whitespace is trimmed and blank lines are skipped, so CRLF
/// input and keep-alive newlines are tolerated. Each `send` is flushed.
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
    buf: String,
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send + Sync,
    W: AsyncWrite + Unpin + Send + Sync,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            buf: String::new(),
        }
    }
}

/// [`LineTransport`] over stdin/stdout.
pub type StdioTransport = LineTransport<BufReader<Stdin>, Stdout>;

impl StdioTransport {
    pub fn stdio() -> Self {
        LineTransport::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::stdio()
    }
}

#[async_trait]
impl<R, W> McpTransport for LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send + Sync,
    W: AsyncWrite + Unpin + Send + Sync,
{
    async fn receive(&mut self) -> Result<Option<String>, McpError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf).await? == 0 {
                return Ok(None);
            }
            let message = self.buf.trim();
            if !message.is_empty() {
                return Ok(Some(message.to_string()));
            }
        }
    }

    async fn send(&mut self, message: &str) -> Result<(), McpError> {
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// In-memory transport backed by a pair of bounded channels.
pub struct ChannelTransport {
    inbox: mpsc::Receiver<String>,
    outbox: mpsc::Sender<String>,
}

impl ChannelTransport {
    /// Two connected ends: what one sends, the other receives.
    pub fn pair() -> (Self, Self) {
        let (to_b, from_a) = mpsc::channel(32);
        let (to_a, from_b) = mpsc::channel(32);
        (
            Self { inbox: from_b, outbox: to_b },
            Self { inbox: from_a, outbox: to_a },
        )
    }
}

#[async_trait]
impl McpTransport for ChannelTransport {
    async fn receive(&mut self) -> Result<Option<String>, McpError> {
        Ok(self.inbox.recv().await)
    }

    async fn send(&mut self, message: &str) -> Result<(), McpError> {
        self.outbox
            .send(message.to_owned())
            .await
            .map_err(|_| McpError::Transport(std::io::ErrorKind::BrokenPipe.into()))
    }
}
