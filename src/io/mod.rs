mod directory;
mod pipe;

pub use directory::DirectorySink;
pub(crate) use directory::is_plain_name;
pub use pipe::StdoutSink;

use async_trait::async_trait;

use crate::error::Result;
use crate::frame::Frame;

/// Destination for frames decoded from an archive
#[async_trait]
pub trait EntrySink: Send {
    /// Materialize one decoded entry
    async fn write_entry(&mut self, frame: &Frame) -> Result<()>;

    /// Called once after the last entry
    async fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
