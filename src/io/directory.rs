use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::EntrySink;
use crate::error::{ArchiveError, IoContext, Result};
use crate::frame::Frame;

/// Writes every entry as a new file directly inside one directory
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files created so far, in archive order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

#[async_trait]
impl EntrySink for DirectorySink {
    async fn write_entry(&mut self, frame: &Frame) -> Result<()> {
        check_entry_name(&frame.name)?;
        let path = self.dir.join(&frame.name);

        // Entries never overwrite: a repeated name in the archive is an error
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    ArchiveError::Malformed(format!("duplicate entry {:?}", frame.name))
                } else {
                    ArchiveError::io(format!("creating {}", path.display()), e)
                }
            })?;

        file.write_all(&frame.content)
            .await
            .io_context(|| format!("writing {}", path.display()))?;
        file.flush()
            .await
            .io_context(|| format!("writing {}", path.display()))?;

        debug!(path = %path.display(), size = frame.content.len(), "entry extracted");
        self.written.push(path);
        Ok(())
    }
}

/// Entry names are plain file names; anything that could escape the
/// destination directory is refused.
pub(crate) fn check_entry_name(name: &str) -> Result<()> {
    if !is_plain_name(name) {
        return Err(ArchiveError::Malformed(format!(
            "entry name {name:?} is not a plain file name"
        )));
    }
    Ok(())
}

/// A single path component with no separator of either platform.
pub(crate) fn is_plain_name(name: &str) -> bool {
    !(name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
        || Path::new(name).is_absolute())
}
