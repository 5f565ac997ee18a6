use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{ArchiveError, IoContext, Result};
use crate::frame::ArchiveEncoder;
use crate::io::is_plain_name;

use super::naming::{archive_file_name, create_unique_file, parent_dir};
use super::{CompressOptions, CompressSummary, SourceKind, check_path_arg};

/// Pack a file, or the files directly inside a folder, into a new archive.
///
/// Folder entries are written in name order so the same folder always
/// produces the same frame sequence. The archive is created next to the
/// source (or in [`CompressOptions::output_dir`]) under a name that does not
/// collide with an existing file. On failure the partial archive is removed.
pub async fn compress(path: &Path, kind: SourceKind, options: &CompressOptions) -> Result<CompressSummary> {
    check_path_arg(path, "source path")?;

    let actual = SourceKind::detect(path).await?;
    if actual != kind {
        return Err(ArchiveError::InvalidInput(format!(
            "{} is a {actual}, not a {kind}",
            path.display()
        )));
    }

    let entries = match kind {
        SourceKind::File => vec![single_entry(path)?],
        SourceKind::Folder => folder_entries(path).await?,
    };

    let name = archive_file_name(path, options.output_name.as_deref(), kind == SourceKind::File)?;
    let out_dir = match &options.output_dir {
        Some(dir) => dir.clone(),
        None => parent_dir(path),
    };
    let (archive_path, file) = create_unique_file(&out_dir, &name).await?;
    info!(
        source = %path.display(),
        archive = %archive_path.display(),
        entries = entries.len(),
        "compressing"
    );

    pack(archive_path, file, &entries, options).await
}

/// Write `entries` into the freshly created archive file, removing it if
/// anything goes wrong.
async fn pack(
    archive_path: PathBuf,
    file: std::fs::File,
    entries: &[(String, PathBuf)],
    options: &CompressOptions,
) -> Result<CompressSummary> {
    match write_archive(file, entries, options).await {
        Ok(input_bytes) => {
            let archive_bytes = fs::metadata(&archive_path)
                .await
                .io_context(|| format!("reading metadata of {}", archive_path.display()))?
                .len();
            Ok(CompressSummary {
                archive_path,
                entries: entries.len(),
                input_bytes,
                archive_bytes,
            })
        }
        Err(e) => {
            warn!(archive = %archive_path.display(), error = %e, "compression failed, removing partial archive");
            if let Err(rm) = fs::remove_file(&archive_path).await {
                warn!(archive = %archive_path.display(), error = %rm, "could not remove partial archive");
            }
            Err(e)
        }
    }
}

async fn write_archive(file: std::fs::File, entries: &[(String, PathBuf)], options: &CompressOptions) -> Result<u64> {
    let mut encoder = ArchiveEncoder::with_level(BufWriter::new(file), options.level);
    let mut input_bytes = 0u64;

    for (name, path) in entries {
        let content = fs::read(path)
            .await
            .io_context(|| format!("reading {}", path.display()))?;
        encoder.write_frame(name, &content)?;
        input_bytes += content.len() as u64;
        debug!(entry = %name, size = content.len(), "entry added");
    }

    let mut writer = encoder.close()?;
    writer.flush().io_context(|| "flushing archive")?;
    Ok(input_bytes)
}

fn single_entry(path: &Path) -> Result<(String, PathBuf)> {
    let name = entry_name(path.file_name(), path)?;
    Ok((name, path.to_path_buf()))
}

/// Regular files directly inside `dir`, sorted by name. Sub folders are not
/// descended into.
pub(crate) async fn folder_entries(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut read_dir = fs::read_dir(dir)
        .await
        .io_context(|| format!("listing {}", dir.display()))?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir
        .next_entry()
        .await
        .io_context(|| format!("listing {}", dir.display()))?
    {
        let path = entry.path();
        let meta = fs::metadata(&path)
            .await
            .io_context(|| format!("reading metadata of {}", path.display()))?;
        if !meta.is_file() {
            debug!(path = %path.display(), "skipping non-file entry");
            continue;
        }
        let name = entry_name(Some(entry.file_name().as_os_str()), &path)?;
        entries.push((name, path));
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

/// Archive names must survive extraction on any platform, so a file whose
/// name holds a `\` is refused here rather than when unpacking.
fn entry_name(name: Option<&std::ffi::OsStr>, path: &Path) -> Result<String> {
    let name = name.and_then(|n| n.to_str()).ok_or_else(|| {
        ArchiveError::InvalidInput(format!("{} does not have a UTF-8 file name", path.display()))
    })?;
    if !is_plain_name(name) {
        return Err(ArchiveError::InvalidInput(format!(
            "{} cannot be stored as an archive entry name",
            path.display()
        )));
    }
    Ok(name.to_string())
}
