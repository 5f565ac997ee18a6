use crate::error::{ArchiveError, Result};

/// Size of each length prefix on the wire.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Largest name or content length a prefix can carry.
pub const MAX_FIELD_LEN: usize = i32::MAX as usize;

/// One (name, content) record of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub name: String,
    pub content: Vec<u8>,
}

impl Frame {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Number of uncompressed payload bytes this frame occupies.
    pub fn wire_len(&self) -> usize {
        2 * LENGTH_PREFIX_SIZE + self.name.len() + self.content.len()
    }
}

/// Bounds the decoder enforces on declared lengths before reading them.
///
/// The defaults accept everything the encoder can write. Tighter limits are
/// for callers that read archives from untrusted sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderLimits {
    pub max_name_len: usize,
    pub max_content_len: usize,
}

impl Default for DecoderLimits {
    fn default() -> Self {
        Self {
            max_name_len: MAX_FIELD_LEN,
            max_content_len: MAX_FIELD_LEN,
        }
    }
}

/// Encode a field length as a prefix value, rejecting what `i32` cannot hold.
pub(crate) fn encode_len(len: usize, field: &str) -> Result<i32> {
    i32::try_from(len).map_err(|_| {
        ArchiveError::InvalidInput(format!(
            "{field} length {len} exceeds the format maximum of {MAX_FIELD_LEN} bytes"
        ))
    })
}

/// Validate a decoded prefix value against a limit.
pub(crate) fn decode_len(raw: i32, limit: usize, field: &str) -> Result<usize> {
    if raw < 0 {
        return Err(ArchiveError::Malformed(format!(
            "negative {field} length {raw}"
        )));
    }
    let len = raw as usize;
    if len > limit {
        return Err(ArchiveError::Malformed(format!(
            "{field} length {len} exceeds limit of {limit} bytes"
        )));
    }
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn wire_len_counts_prefixes() {
        assert_eq!(Frame::new("", Vec::new()).wire_len(), 8);
        assert_eq!(Frame::new("a.txt", b"hi".to_vec()).wire_len(), 8 + 5 + 2);
        // multi-byte characters count in UTF-8 bytes
        assert_eq!(Frame::new("é", Vec::new()).wire_len(), 8 + 2);
    }

    #[test]
    fn decode_len_rejects_negative_and_oversized() {
        assert_eq!(decode_len(0, 10, "name").unwrap(), 0);
        assert_eq!(decode_len(10, 10, "name").unwrap(), 10);

        let err = decode_len(-1, 10, "name").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedArchive);

        let err = decode_len(11, 10, "content").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedArchive);
        assert!(err.to_string().contains("content length 11"));
    }

    #[test]
    fn encode_len_bounds() {
        assert_eq!(encode_len(MAX_FIELD_LEN, "content").unwrap(), i32::MAX);
        let err = encode_len(MAX_FIELD_LEN + 1, "content").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
