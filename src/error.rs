//! Error types shared by the frame codec and the archive operations.

use std::io;

/// Coarse classification of an [`ArchiveError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty or missing path, wrong source kind, unrepresentable entry.
    InvalidInput,
    /// The underlying sink or source failed.
    Io,
    /// The archive ended mid-frame or contains data that cannot be a frame.
    MalformedArchive,
    /// The session was used after it was closed.
    InvalidState,
}

/// Errors produced while packing or unpacking an archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed archive: {0}")]
    Malformed(String),

    #[error("archive session already closed")]
    Closed,
}

impl ArchiveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArchiveError::InvalidInput(_) => ErrorKind::InvalidInput,
            ArchiveError::Io { .. } => ErrorKind::Io,
            ArchiveError::Malformed(_) => ErrorKind::MalformedArchive,
            ArchiveError::Closed => ErrorKind::InvalidState,
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        ArchiveError::Io {
            context: context.into(),
            source,
        }
    }
}

impl From<io::Error> for ArchiveError {
    fn from(source: io::Error) -> Self {
        ArchiveError::io("I/O error", source)
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Attach a description of the failing operation to an I/O result.
pub(crate) trait IoContext<T> {
    fn io_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn io_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| ArchiveError::io(f(), e))
    }
}
