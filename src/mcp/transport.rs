//! Line-delimited byte-stream transport.
//!
//! - Messages are UTF-8 encoded JSON-RPC
//! - Messages are delimited by newlines (`\r\n` is tolerated on input)
//! - Messages must not contain embedded newlines
//! - The input stream carries requests, the output stream responses
//! - stderr is left for logging
//!
//! The transport is generic over the reader and writer so the server loop can
//! run against in-memory buffers as well as stdin/stdout.

use std::io;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tracing::trace;

use crate::mcp::protocol::{JsonRpcError, JsonRpcResponse};

/// A newline-framed JSON-RPC transport.
pub struct StdioTransport<R = Stdin, W = Stdout> {
    /// Buffered input stream.
    reader: BufReader<R>,
    /// Output stream.
    writer: W,
}

impl StdioTransport {
    /// Creates a transport over the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a transport over the given streams.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Reads the next frame.
    ///
    /// Returns `None` once the input stream is closed (EOF). Invalid UTF-8 is
    /// replaced with U+FFFD rather than failing the read.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        let bytes_read = self.reader.read_until(b'\n', &mut buf).await?;

        if bytes_read == 0 {
            return Ok(None);
        }

        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                buf.pop();
            }
        }

        let line = match String::from_utf8(buf) {
            Ok(line) => line,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };

        trace!(len = line.len(), "read frame");
        Ok(Some(line))
    }

    /// Writes a JSON-RPC response.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub async fn write_response(&mut self, response: &JsonRpcResponse) -> io::Result<()> {
        self.write_message(response).await
    }

    /// Writes a JSON-RPC error.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub async fn write_error(&mut self, error: &JsonRpcError) -> io::Result<()> {
        self.write_message(error).await
    }

    async fn write_message<T: Serialize>(&mut self, message: &T) -> io::Result<()> {
        let json = serde_json::to_string(message)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        self.write_raw(&json).await
    }

    /// Writes a raw JSON string with newline termination, then flushes.
    async fn write_raw(&mut self, json: &str) -> io::Result<()> {
        // serde_json escapes control characters, so compact output is one line
        debug_assert!(
            !json.contains('\n'),
            "JSON message must not contain embedded newlines"
        );

        trace!(len = json.len(), "writing frame");
        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;

        Ok(())
    }

    /// Consumes the transport, returning the output stream.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::protocol::RequestId;

    fn transport(input: &[u8]) -> StdioTransport<&[u8], Vec<u8>> {
        StdioTransport::new(input, Vec::new())
    }

    #[tokio::test]
    async fn read_strips_line_endings() {
        let mut t = transport(b"{\"a\":1}\r\n{\"b\":2}\n");
        assert_eq!(t.read_line().await.unwrap(), Some("{\"a\":1}".to_string()));
        assert_eq!(t.read_line().await.unwrap(), Some("{\"b\":2}".to_string()));
        assert_eq!(t.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn read_last_line_without_newline() {
        let mut t = transport(b"tail");
        assert_eq!(t.read_line().await.unwrap(), Some("tail".to_string()));
        assert_eq!(t.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn read_replaces_invalid_utf8() {
        let mut t = transport(b"{\"a\":\"\xff\"}\n");
        let line = t.read_line().await.unwrap().unwrap();
        assert!(line.contains('\u{FFFD}'));
    }

    #[tokio::test]
    async fn write_appends_newline() {
        let mut t = transport(b"");
        let response = JsonRpcResponse::success(
            RequestId::Number(1),
            serde_json::json!({
                "message": "hello\nworld",
                "nested": {"key": "value"}
            }),
        );
        t.write_response(&response).await.unwrap();

        let output = String::from_utf8(t.into_writer()).unwrap();
        assert!(output.ends_with('\n'));
        assert_eq!(output.matches('\n').count(), 1);
    }

    #[tokio::test]
    async fn write_error_is_one_frame() {
        let mut t = transport(b"");
        let error = JsonRpcError::method_not_found(RequestId::Number(1), "test/method");
        t.write_error(&error).await.unwrap();

        let output = String::from_utf8(t.into_writer()).unwrap();
        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("-32601"));
    }
}
