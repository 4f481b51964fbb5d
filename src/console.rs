//! Line-based terminal I/O
//!
//! Thin wrappers around `AsyncBufReadExt` / `AsyncWriteExt` that flush
//! after every write, so prompts appear before the program blocks on
//! input. Generic over the streams so the account picker and the command
//! loop can be driven from byte slices in tests.

use crate::error::Result;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};

/// A prompt-and-read console over an input and an output stream.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<BufReader<Stdin>, Stdout> {
    /// Console bound to the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Read one line, trimmed. `None` at end of input.
    ///
    /// Bytes that are not valid UTF-8 are replaced, so garbage input
    /// reads as an unrecognised line rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the input stream fails.
    pub async fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).trim().to_string()))
    }

    /// Write text as-is and flush.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the output stream fails.
    pub async fn write(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }

    /// Write text followed by a newline and flush.
    ///
    /// # Errors
    ///
    /// Same as [`Console::write`].
    pub async fn println(&mut self, text: &str) -> Result<()> {
        self.write(text).await?;
        self.write("\n").await
    }

    /// Show `[msg: <label>]>> ` and read the answer.
    ///
    /// # Errors
    ///
    /// Propagates I/O failures from either stream.
    pub async fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        self.write(&format!("[msg: {label}]>> ")).await?;
        self.read_line().await
    }

    /// Give back the output stream (used to inspect captured output).
    pub fn into_output(self) -> W {
        self.output
    }
}
