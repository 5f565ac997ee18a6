use async_trait::async_trait;
use tokio::io::{AsyncWriteExt, Stdout};

use super::EntrySink;
use crate::error::{IoContext, Result};
use crate::frame::Frame;

/// Writes entry contents back to back on stdout
pub struct StdoutSink {
    stdout: Stdout,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            stdout: tokio::io::stdout(),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntrySink for StdoutSink {
    async fn write_entry(&mut self, frame: &Frame) -> Result<()> {
        self.stdout
            .write_all(&frame.content)
            .await
            .io_context(|| "writing to stdout")
    }

    async fn finish(&mut self) -> Result<()> {
        self.stdout.flush().await.io_context(|| "flushing stdout")
    }
}
