//! Frame codec: many files multiplexed into one gzip stream.
//!
//! ## Wire Format
//!
//! The uncompressed payload of the gzip stream is a plain concatenation of
//! frames, with no header, separator or trailer of its own:
//!
//! | Field            | Size                  | Notes                        |
//! |------------------|-----------------------|------------------------------|
//! | `name_length`    | 4 bytes, i32 LE       | byte length of `name`        |
//! | `name`           | `name_length` bytes   | UTF-8, no NUL                |
//! | `content_length` | 4 bytes, i32 LE       | byte length of `content`     |
//! | `content`        | `content_length` bytes| raw file bytes               |
//!
//! A frame therefore occupies `8 + name_length + content_length` bytes and
//! can be parsed with no lookahead. The end of the gzip payload is the only
//! terminator: ending exactly on a frame boundary is a clean end of archive,
//! ending anywhere else is a truncated archive.
//!
//! The whole archive is one compression session, so it can only be read
//! sequentially, in the order the frames were written.

mod decoder;
mod encoder;
mod structures;

pub use decoder::{ArchiveDecoder, DecoderState};
pub use encoder::ArchiveEncoder;
pub use structures::*;
