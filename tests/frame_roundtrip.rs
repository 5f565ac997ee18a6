//! Round-trip and truncation tests for the frame codec.
//!
//! These tests drive the encoder and decoder purely in memory:
//! - Arbitrary (name, content) sequences survive a round trip in order
//! - Content sizes around internal buffer boundaries are reproduced exactly
//! - Cutting the payload anywhere inside a frame is reported as malformed

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use gzpack::{ArchiveDecoder, ArchiveEncoder, ErrorKind, Frame};
use proptest::prelude::*;
use std::io::{Read, Write};

fn encode(frames: &[Frame]) -> Vec<u8> {
    let mut encoder = ArchiveEncoder::new(Vec::new());
    for frame in frames {
        encoder.write_frame(&frame.name, &frame.content).unwrap();
    }
    encoder.close().unwrap()
}

fn decode(archive: &[u8]) -> gzpack::Result<Vec<Frame>> {
    ArchiveDecoder::new(archive).collect()
}

fn payload_of(archive: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    GzDecoder::new(archive).read_to_end(&mut out).unwrap();
    out
}

fn regzip(payload: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
    encoder.write_all(payload).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn test_example_pairs_round_trip() {
    let frames = vec![
        Frame::new("a.txt", b"hi".to_vec()),
        Frame::new("b.txt", Vec::new()),
    ];
    assert_eq!(decode(&encode(&frames)).unwrap(), frames);
}

#[test]
fn test_empty_archive_has_no_frames() {
    assert!(decode(&encode(&[])).unwrap().is_empty());
}

#[test]
fn test_boundary_content_sizes() {
    // around flate2's 32 KiB internal buffers and well past them
    let sizes = [0usize, 1, 4095, 4096, 32 * 1024 - 1, 32 * 1024, 32 * 1024 + 1, 3 * 1024 * 1024 + 7];
    let frames: Vec<Frame> = sizes
        .iter()
        .map(|&n| {
            let content: Vec<u8> = (0..n).map(|i| (i * 31 % 251) as u8).collect();
            Frame::new(format!("size-{n}"), content)
        })
        .collect();

    let decoded = decode(&encode(&frames)).unwrap();
    assert_eq!(decoded.len(), sizes.len());
    for (frame, &n) in decoded.iter().zip(&sizes) {
        assert_eq!(frame.content.len(), n);
    }
    assert_eq!(decoded, frames);
}

#[test]
fn test_every_truncation_point_is_detected() {
    let frames = vec![
        Frame::new("first", b"0123456789".to_vec()),
        Frame::new("second", b"abc".to_vec()),
    ];
    let payload = payload_of(&encode(&frames));
    let first_len = frames[0].wire_len();
    assert_eq!(payload.len(), first_len + frames[1].wire_len());

    for cut in 1..payload.len() {
        let archive = regzip(&payload[..cut]);
        let results: Vec<_> = ArchiveDecoder::new(archive.as_slice()).collect();

        if cut == first_len {
            // a cut on a frame boundary is just a shorter archive
            assert_eq!(results.len(), 1, "cut={cut}");
            assert!(results[0].is_ok());
            continue;
        }

        let last = results.last().expect("at least one result");
        let err = last.as_ref().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedArchive, "cut={cut}");
        let expected_ok = if cut > first_len { 1 } else { 0 };
        assert_eq!(results.len(), expected_ok + 1, "cut={cut}");
    }
}

#[test]
fn test_encoding_is_deterministic_at_payload_level() {
    let frames = vec![
        Frame::new("x", b"same".to_vec()),
        Frame::new("y", b"input".to_vec()),
    ];
    let first = encode(&frames);
    let second = encode(&frames);
    assert_eq!(payload_of(&first), payload_of(&second));
    assert_eq!(decode(&first).unwrap(), decode(&second).unwrap());
}

#[test]
fn test_non_ascii_names_use_utf8_byte_lengths() {
    let frames = vec![Frame::new("résumé – 履歴書.txt", b"cv".to_vec())];
    let payload = payload_of(&encode(&frames));
    let declared = i32::from_le_bytes(payload[..4].try_into().unwrap());
    assert_eq!(declared as usize, "résumé – 履歴書.txt".len());
    assert_eq!(decode(&regzip(&payload)).unwrap(), frames);
}

fn frame_strategy() -> impl Strategy<Value = Frame> {
    (
        "[^\\x00]{0,40}",
        proptest::collection::vec(any::<u8>(), 0..2048),
    )
        .prop_map(|(name, content)| Frame::new(name, content))
}

proptest! {
    #[test]
    fn prop_round_trip_preserves_order_and_bytes(
        frames in proptest::collection::vec(frame_strategy(), 0..12)
    ) {
        let decoded = decode(&encode(&frames)).unwrap();
        prop_assert_eq!(decoded, frames);
    }

    #[test]
    fn prop_payload_is_sum_of_frame_lengths(
        frames in proptest::collection::vec(frame_strategy(), 0..12)
    ) {
        let payload = payload_of(&encode(&frames));
        let expected: usize = frames.iter().map(Frame::wire_len).sum();
        prop_assert_eq!(payload.len(), expected);
    }
}
