//! File-system layer: turning files and folders into archives and back.
//!
//! ## Operations
//!
//! - [`compress`]: pack one file, or every file directly inside a folder,
//!   into `<name>.gzip` next to the source
//! - [`extract`]: unpack an archive into a new folder named after it
//! - [`list`]: read entry names and sizes without writing anything
//!
//! [`compress_status`] and [`extract_status`] wrap the first two for callers
//! that only care whether the operation worked.

mod compressor;
mod extractor;
pub mod naming;

pub use compressor::compress;
pub use extractor::{extract, extract_to_sink, list};

use flate2::Compression;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{ArchiveError, Result};
use crate::frame::DecoderLimits;

/// Whether a source path names a single file or a folder of files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Folder,
}

impl SourceKind {
    /// Resolve the kind of an existing path.
    pub async fn detect(path: &Path) -> Result<Self> {
        check_path_arg(path, "source path")?;
        let meta = tokio::fs::metadata(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                ArchiveError::InvalidInput(format!("{} does not exist", path.display()))
            }
            _ => ArchiveError::io(format!("reading metadata of {}", path.display()), e),
        })?;

        if meta.is_file() {
            Ok(SourceKind::File)
        } else if meta.is_dir() {
            Ok(SourceKind::Folder)
        } else {
            Err(ArchiveError::InvalidInput(format!(
                "{} is neither a file nor a folder",
                path.display()
            )))
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::File => f.write_str("file"),
            SourceKind::Folder => f.write_str("folder"),
        }
    }
}

/// Settings for [`compress`]
#[derive(Debug, Clone)]
pub struct CompressOptions {
    /// Archive file name; `.gzip` is appended when missing. Derived from the
    /// source when `None` or empty.
    pub output_name: Option<String>,
    /// Directory to create the archive in, instead of the source's parent
    pub output_dir: Option<PathBuf>,
    pub level: Compression,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            output_name: None,
            output_dir: None,
            level: Compression::default(),
        }
    }
}

/// Settings for [`extract`] and [`list`]
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Directory to create the destination folder in, instead of the
    /// archive's parent
    pub dest_parent: Option<PathBuf>,
    pub limits: DecoderLimits,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressSummary {
    pub archive_path: PathBuf,
    pub entries: usize,
    /// Total content bytes packed
    pub input_bytes: u64,
    /// Size of the archive file
    pub archive_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    pub dest_dir: PathBuf,
    pub entries: usize,
    pub bytes: u64,
}

/// One entry as reported by [`list`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub name: String,
    pub size: u64,
}

/// Two-valued outcome for callers that do not inspect errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

impl Status {
    /// `0` on success, `-1` on failure
    pub fn code(self) -> i32 {
        match self {
            Status::Success => 0,
            Status::Failure => -1,
        }
    }

    pub fn is_success(self) -> bool {
        self == Status::Success
    }
}

impl<T> From<&Result<T>> for Status {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Status::Success,
            Err(_) => Status::Failure,
        }
    }
}

/// [`compress`] with default options, reduced to a [`Status`].
pub async fn compress_status(path: &Path, output_name: Option<&str>, is_file: bool) -> Status {
    let kind = if is_file {
        SourceKind::File
    } else {
        SourceKind::Folder
    };
    let options = CompressOptions {
        output_name: output_name.map(str::to_string),
        ..CompressOptions::default()
    };

    let result = compress(path, kind, &options).await;
    if let Err(e) = &result {
        warn!(path = %path.display(), kind = ?e.kind(), error = %e, "compress failed");
    }
    Status::from(&result)
}

/// [`extract`] with default options, reduced to a [`Status`].
pub async fn extract_status(archive_path: &Path) -> Status {
    let result = extract(archive_path, &ExtractOptions::default()).await;
    if let Err(e) = &result {
        warn!(archive = %archive_path.display(), kind = ?e.kind(), error = %e, "extract failed");
    }
    Status::from(&result)
}

pub(crate) fn check_path_arg(path: &Path, what: &str) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(ArchiveError::InvalidInput(format!("{what} is empty")));
    }
    Ok(())
}
