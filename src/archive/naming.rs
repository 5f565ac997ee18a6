use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{ArchiveError, IoContext, Result};

/// Extension reserved for archives
pub const ARCHIVE_EXTENSION: &str = "gzip";

/// Give up after this many `name (n)` candidates
const MAX_UNIQUE_ATTEMPTS: u32 = 10_000;

/// Work out the archive file name for a source.
///
/// Without a caller-supplied name, a file source is named after its stem
/// and a folder after its full name. A supplied name keeps its own spelling
/// and only gets the extension appended when it does not already end with
/// `.gzip`.
pub fn archive_file_name(source: &Path, output_name: Option<&str>, is_file: bool) -> Result<String> {
    let suffix = format!(".{ARCHIVE_EXTENSION}");

    match output_name.filter(|n| !n.is_empty()) {
        Some(name) => {
            if name.contains(['/', '\\']) {
                return Err(ArchiveError::InvalidInput(format!(
                    "output name {name:?} must not contain path separators"
                )));
            }
            if name.ends_with(&suffix) {
                Ok(name.to_string())
            } else {
                Ok(format!("{name}{suffix}"))
            }
        }
        None => {
            let base = if is_file {
                source.file_stem()
            } else {
                source.file_name()
            };
            let base = base
                .and_then(|s| s.to_str())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    ArchiveError::InvalidInput(format!(
                        "cannot derive an archive name from {}",
                        source.display()
                    ))
                })?;
            Ok(format!("{base}{suffix}"))
        }
    }
}

/// Destination folder name for an archive: its file name without the last
/// extension.
pub fn extraction_dir_name(archive: &Path) -> Result<String> {
    archive
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ArchiveError::InvalidInput(format!(
                "cannot derive a folder name from {}",
                archive.display()
            ))
        })
}

/// The directory a path lives in, `.` for bare relative names.
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// `n`-th collision candidate: `name (n).ext`, or `name (n)` without extension.
pub fn candidate_name(name: &str, n: u32) -> String {
    if n < 2 {
        return name.to_string();
    }
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{} ({n}){}", &name[..dot], &name[dot..]),
        _ => format!("{name} ({n})"),
    }
}

/// Create a new file in `dir`, disambiguating the name if it is taken.
pub async fn create_unique_file(dir: &Path, name: &str) -> Result<(PathBuf, std::fs::File)> {
    for n in 1..=MAX_UNIQUE_ATTEMPTS {
        let path = dir.join(candidate_name(name, n));
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((path, file.into_std().await)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(ArchiveError::io(format!("creating {}", path.display()), e)),
        }
    }
    Err(no_free_name(dir, name))
}

/// Create a new directory in `parent`, disambiguating the name if it is taken.
pub async fn create_unique_dir(parent: &Path, name: &str) -> Result<PathBuf> {
    fs::create_dir_all(parent)
        .await
        .io_context(|| format!("creating {}", parent.display()))?;

    for n in 1..=MAX_UNIQUE_ATTEMPTS {
        let path = parent.join(dir_candidate_name(name, n));
        match fs::create_dir(&path).await {
            Ok(()) => return Ok(path),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(ArchiveError::io(format!("creating {}", path.display()), e)),
        }
    }
    Err(no_free_name(parent, name))
}

// Folder names keep any dots intact: `v1.2` collides to `v1.2 (2)`
fn dir_candidate_name(name: &str, n: u32) -> String {
    if n < 2 {
        name.to_string()
    } else {
        format!("{name} ({n})")
    }
}

fn no_free_name(dir: &Path, name: &str) -> ArchiveError {
    ArchiveError::io(
        format!("no free name for {name:?} in {}", dir.display()),
        io::Error::from(io::ErrorKind::AlreadyExists),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_name_for_file_drops_extension() {
        let name = archive_file_name(Path::new("/data/report.txt"), None, true).unwrap();
        assert_eq!(name, "report.gzip");
    }

    #[test]
    fn default_name_for_folder_keeps_full_name() {
        let name = archive_file_name(Path::new("/data/photos.2024"), None, false).unwrap();
        assert_eq!(name, "photos.2024.gzip");
        let name = archive_file_name(Path::new("/data/photos.2024"), Some(""), false).unwrap();
        assert_eq!(name, "photos.2024.gzip");
    }

    #[test]
    fn supplied_name_gets_extension_once() {
        let src = Path::new("/data/x");
        assert_eq!(archive_file_name(src, Some("out"), false).unwrap(), "out.gzip");
        assert_eq!(archive_file_name(src, Some("out.gzip"), false).unwrap(), "out.gzip");
        assert_eq!(archive_file_name(src, Some("out.GZIP"), false).unwrap(), "out.GZIP.gzip");
        assert!(archive_file_name(src, Some("a/b"), false).is_err());
    }

    #[test]
    fn extraction_dir_strips_last_extension() {
        assert_eq!(extraction_dir_name(Path::new("/x/docs.gzip")).unwrap(), "docs");
        assert_eq!(extraction_dir_name(Path::new("docs.tar.gzip")).unwrap(), "docs.tar");
        assert!(extraction_dir_name(Path::new("/")).is_err());
    }

    #[test]
    fn candidates() {
        assert_eq!(candidate_name("a.gzip", 1), "a.gzip");
        assert_eq!(candidate_name("a.gzip", 2), "a (2).gzip");
        assert_eq!(candidate_name("a.b.gzip", 3), "a.b (3).gzip");
        assert_eq!(candidate_name(".gzip", 2), ".gzip (2)");
        assert_eq!(candidate_name("plain", 2), "plain (2)");
        assert_eq!(dir_candidate_name("v1.2", 2), "v1.2 (2)");
    }

    #[test]
    fn parent_of_bare_name_is_cwd() {
        assert_eq!(parent_dir(Path::new("a.gzip")), PathBuf::from("."));
        assert_eq!(parent_dir(Path::new("x/a.gzip")), PathBuf::from("x"));
    }

    #[tokio::test]
    async fn unique_file_and_dir_do_not_clobber() {
        let dir = tempfile::tempdir().unwrap();

        let (first, _) = create_unique_file(dir.path(), "a.gzip").await.unwrap();
        let (second, _) = create_unique_file(dir.path(), "a.gzip").await.unwrap();
        assert_eq!(first, dir.path().join("a.gzip"));
        assert_eq!(second, dir.path().join("a (2).gzip"));

        let d1 = create_unique_dir(dir.path(), "a").await.unwrap();
        let d2 = create_unique_dir(dir.path(), "a").await.unwrap();
        assert_eq!(d1, dir.path().join("a"));
        assert_eq!(d2, dir.path().join("a (2)"));
    }
}
