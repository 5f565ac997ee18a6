use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use tracing::trace;

use crate::error::{ArchiveError, IoContext, Result};

use super::structures::encode_len;

/// Writes frames into a single gzip stream.
///
/// The compression context spans every frame of the session, so frames are
/// not independently compressed. Call [`close`](Self::close) to write the
/// gzip trailer; an encoder dropped without closing is an abandoned archive.
///
/// ## Example
///
/// ```
/// use gzpack::frame::{ArchiveDecoder, ArchiveEncoder};
///
/// let mut encoder = ArchiveEncoder::new(Vec::new());
/// encoder.write_frame("a.txt", b"hi").unwrap();
/// encoder.write_frame("b.txt", b"").unwrap();
/// let archive = encoder.close().unwrap();
///
/// let names: Vec<String> = ArchiveDecoder::new(archive.as_slice())
///     .map(|frame| frame.unwrap().name)
///     .collect();
/// assert_eq!(names, ["a.txt", "b.txt"]);
/// ```
pub struct ArchiveEncoder<W: Write> {
    /// `None` once the session has been closed
    inner: Option<GzEncoder<W>>,
    frames_written: u64,
}

impl<W: Write> ArchiveEncoder<W> {
    pub fn new(sink: W) -> Self {
        Self::with_level(sink, Compression::default())
    }

    pub fn with_level(sink: W, level: Compression) -> Self {
        Self {
            inner: Some(GzEncoder::new(sink, level)),
            frames_written: 0,
        }
    }

    /// Append one frame: name length, name, content length, content.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::Closed`] after [`close`](Self::close)
    /// - [`ArchiveError::InvalidInput`] if the name contains NUL or a field
    ///   is longer than `i32::MAX` bytes
    /// - [`ArchiveError::Io`] if the sink rejects a write; the archive is
    ///   unusable afterwards
    pub fn write_frame(&mut self, name: &str, content: &[u8]) -> Result<()> {
        let writer = self.inner.as_mut().ok_or(ArchiveError::Closed)?;

        if name.contains('\0') {
            return Err(ArchiveError::InvalidInput(format!(
                "entry name {name:?} contains a NUL character"
            )));
        }
        let name_len = encode_len(name.len(), "name")?;
        let content_len = encode_len(content.len(), "content")?;

        let ctx = || format!("writing frame {name:?}");
        writer.write_i32::<LittleEndian>(name_len).io_context(ctx)?;
        writer.write_all(name.as_bytes()).io_context(ctx)?;
        writer.write_i32::<LittleEndian>(content_len).io_context(ctx)?;
        writer.write_all(content).io_context(ctx)?;

        self.frames_written += 1;
        trace!(entry = name, content_len, index = self.frames_written, "frame written");
        Ok(())
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Finish the gzip stream and hand back the sink.
    pub fn close(&mut self) -> Result<W> {
        let writer = self.inner.take().ok_or(ArchiveError::Closed)?;
        writer.finish().io_context(|| "finishing gzip stream")
    }
}
