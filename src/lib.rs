//! # gzpack
//!
//! Pack files and folders into a single gzip stream, and unpack them again.
//!
//! An archive is one gzip stream whose payload is a sequence of
//! length-prefixed frames, one per file. There is no index and no per-entry
//! metadata beyond the file name: entries are read back sequentially, in the
//! order they were written.
//!
//! ## Features
//!
//! - Compress a single file or every file directly inside a folder
//! - Deterministic entry order (folder entries are sorted by name)
//! - Extract into a fresh folder named after the archive
//! - Little-endian length prefixes and UTF-8 names, identical on every host
//! - Truncated and corrupt archives are reported, never silently cut short
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use gzpack::{CompressOptions, ExtractOptions, SourceKind, compress, extract};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let summary = compress(Path::new("photos"), SourceKind::Folder, &CompressOptions::default()).await?;
//!     println!("wrote {}", summary.archive_path.display());
//!
//!     let unpacked = extract(&summary.archive_path, &ExtractOptions::default()).await?;
//!     println!("{} files in {}", unpacked.entries, unpacked.dest_dir.display());
//!
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod cli;
pub mod error;
pub mod frame;
pub mod io;

pub use archive::{
    CompressOptions, CompressSummary, EntryInfo, ExtractOptions, ExtractSummary, SourceKind,
    Status, compress, compress_status, extract, extract_status, extract_to_sink, list,
};
pub use cli::Cli;
pub use error::{ArchiveError, ErrorKind, Result};
pub use frame::{ArchiveDecoder, ArchiveEncoder, DecoderLimits, Frame};
pub use io::{DirectorySink, EntrySink, StdoutSink};
