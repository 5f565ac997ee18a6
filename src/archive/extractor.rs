use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{ArchiveError, Result};
use crate::frame::{ArchiveDecoder, DecoderLimits};
use crate::io::{DirectorySink, EntrySink};

use super::naming::{create_unique_dir, extraction_dir_name, parent_dir};
use super::{EntryInfo, ExtractOptions, ExtractSummary, check_path_arg};

/// Unpack an archive into a new folder named after it.
///
/// The folder is created next to the archive (or under
/// [`ExtractOptions::dest_parent`]) and disambiguated if the name is taken.
/// Entries are written as they are decoded; on failure, entries already
/// written stay in place.
pub async fn extract(archive_path: &Path, options: &ExtractOptions) -> Result<ExtractSummary> {
    check_path_arg(archive_path, "archive path")?;
    let file = open_archive(archive_path)?;

    let dir_name = extraction_dir_name(archive_path)?;
    let parent = match &options.dest_parent {
        Some(dir) => dir.clone(),
        None => parent_dir(archive_path),
    };
    let dest = create_unique_dir(&parent, &dir_name).await?;
    info!(archive = %archive_path.display(), dest = %dest.display(), "extracting");

    let mut sink = DirectorySink::new(&dest);
    match drive(ArchiveDecoder::with_limits(file, options.limits), &mut sink).await {
        Ok((entries, bytes)) => Ok(ExtractSummary {
            dest_dir: dest,
            entries,
            bytes,
        }),
        Err(e) => {
            warn!(
                dest = %sink.dir().display(),
                written = sink.written().len(),
                error = %e,
                "extraction failed, leaving entries written so far"
            );
            Err(e)
        }
    }
}

/// Decode every entry of an archive into `sink`.
///
/// Returns the number of entries and content bytes delivered.
pub async fn extract_to_sink<S: EntrySink>(archive_path: &Path, sink: &mut S, limits: DecoderLimits) -> Result<(usize, u64)> {
    check_path_arg(archive_path, "archive path")?;
    let file = open_archive(archive_path)?;
    drive(ArchiveDecoder::with_limits(file, limits), sink).await
}

/// Names and sizes of the entries in an archive, in archive order.
pub fn list(archive_path: &Path, options: &ExtractOptions) -> Result<Vec<EntryInfo>> {
    check_path_arg(archive_path, "archive path")?;
    let file = open_archive(archive_path)?;

    ArchiveDecoder::with_limits(file, options.limits)
        .map(|frame| {
            frame.map(|f| EntryInfo {
                size: f.content.len() as u64,
                name: f.name,
            })
        })
        .collect()
}

async fn drive<S: EntrySink + ?Sized>(mut decoder: ArchiveDecoder<File>, sink: &mut S) -> Result<(usize, u64)> {
    let mut entries = 0usize;
    let mut bytes = 0u64;

    while let Some(frame) = decoder.next_frame() {
        let frame = frame?;
        sink.write_entry(&frame).await?;
        entries += 1;
        bytes += frame.content.len() as u64;
    }
    sink.finish().await?;

    Ok((entries, bytes))
}

fn open_archive(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            ArchiveError::InvalidInput(format!("archive {} does not exist", path.display()))
        }
        _ => ArchiveError::io(format!("opening {}", path.display()), e),
    })
}
