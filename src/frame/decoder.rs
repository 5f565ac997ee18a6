use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use flate2::read::GzDecoder;
use std::io::{self, Read};
use tracing::trace;

use crate::error::{ArchiveError, Result};

use super::structures::{DecoderLimits, Frame, LENGTH_PREFIX_SIZE, decode_len};

/// Field buffers start at most this large and grow as bytes arrive, so a
/// forged length prefix cannot force a huge allocation up front.
const INITIAL_FIELD_CAPACITY: usize = 64 * 1024;

/// Decoder session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// More frames may follow
    Ready,
    /// The payload ended cleanly on a frame boundary
    Exhausted,
    /// A frame could not be parsed; no further frames are produced
    Failed,
}

/// Reads frames back out of a gzip stream, in the order they were written.
///
/// The decoder is forward only. It yields each frame as soon as it is
/// parsed and keeps no frames itself; to read an archive again, open a new
/// session.
pub struct ArchiveDecoder<R: Read> {
    reader: GzDecoder<R>,
    limits: DecoderLimits,
    state: DecoderState,
    frames_read: u64,
}

impl<R: Read> ArchiveDecoder<R> {
    pub fn new(source: R) -> Self {
        Self::with_limits(source, DecoderLimits::default())
    }

    pub fn with_limits(source: R, limits: DecoderLimits) -> Self {
        Self {
            reader: GzDecoder::new(source),
            limits,
            state: DecoderState::Ready,
            frames_read: 0,
        }
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Number of frames yielded so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Parse the next frame.
    ///
    /// Returns `None` once the payload is exhausted or after an error has
    /// been reported. A stream that ends anywhere but on a frame boundary
    /// yields [`ArchiveError::Malformed`].
    pub fn next_frame(&mut self) -> Option<Result<Frame>> {
        if self.state != DecoderState::Ready {
            return None;
        }

        match self.read_frame() {
            Ok(Some(frame)) => {
                self.frames_read += 1;
                trace!(
                    entry = %frame.name,
                    content_len = frame.content.len(),
                    index = self.frames_read,
                    "frame read"
                );
                Some(Ok(frame))
            }
            Ok(None) => {
                self.state = DecoderState::Exhausted;
                None
            }
            Err(e) => {
                self.state = DecoderState::Failed;
                Some(Err(e))
            }
        }
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        let raw_name_len = match self.read_leading_prefix()? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        let name_len = decode_len(raw_name_len, self.limits.max_name_len, "name")?;

        let name_bytes = self.read_field(name_len, "entry name")?;
        let name = String::from_utf8(name_bytes)
            .map_err(|_| ArchiveError::Malformed("entry name is not valid UTF-8".into()))?;
        if name.contains('\0') {
            return Err(ArchiveError::Malformed(format!(
                "entry name {name:?} contains a NUL character"
            )));
        }

        let raw_content_len = self
            .reader
            .read_i32::<LittleEndian>()
            .map_err(|e| read_error(e, "content length"))?;
        let content_len = decode_len(raw_content_len, self.limits.max_content_len, "content")?;

        let content = self.read_field(content_len, "entry content")?;

        Ok(Some(Frame { name, content }))
    }

    /// Read exactly `len` bytes, growing the buffer with the data actually
    /// present.
    fn read_field(&mut self, len: usize, field: &str) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(len.min(INITIAL_FIELD_CAPACITY));
        (&mut self.reader)
            .take(len as u64)
            .read_to_end(&mut buf)
            .map_err(|e| read_error(e, field))?;
        if buf.len() != len {
            return Err(ArchiveError::Malformed(format!(
                "{field} declares {len} bytes but the stream ends after {}",
                buf.len()
            )));
        }
        Ok(buf)
    }

    /// Read the name length of the next frame, or `None` on a clean end of
    /// stream. A partial prefix is a truncated archive.
    fn read_leading_prefix(&mut self) -> Result<Option<i32>> {
        let mut buf = [0u8; LENGTH_PREFIX_SIZE];
        let mut filled = 0;

        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(read_error(e, "name length")),
            }
        }

        match filled {
            0 => Ok(None),
            LENGTH_PREFIX_SIZE => Ok(Some(LittleEndian::read_i32(&buf))),
            n => Err(ArchiveError::Malformed(format!(
                "stream ends after {n} of {LENGTH_PREFIX_SIZE} name length bytes"
            ))),
        }
    }
}

impl<R: Read> Iterator for ArchiveDecoder<R> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame()
    }
}

/// Classify a read failure: short reads and corrupt gzip data are archive
/// problems, anything else comes from the source.
fn read_error(e: io::Error, field: &str) -> ArchiveError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => {
            ArchiveError::Malformed(format!("stream ends inside {field}"))
        }
        io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput => {
            ArchiveError::Malformed(format!("corrupt compressed data while reading {field}: {e}"))
        }
        _ => ArchiveError::io(format!("reading {field}"), e),
    }
}
