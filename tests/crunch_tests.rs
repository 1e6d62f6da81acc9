//! Tests for PP20 decrunching
//!
//! Blobs are built with a test-side bit emitter so every literal, selector
//! and offset path of the decoder is exercised with known output.

mod common;

use common::{literal_blob, BitEmitter, WIDTHS};
use crunchkit::{decrunch, decrunch_into, decrunch_with_len, AssetError, CrunchHeader};

/// Literals then a selector-2 match with an 11-bit offset
fn ababab_bits() -> BitEmitter {
    let mut bits = BitEmitter::new();
    bits.put(0, 1).literal_count(2);
    bits.put(b'B' as u32, 8).put(b'A' as u32, 8);
    bits.put(2, 2).put(1, 11);
    bits
}

#[test]
fn test_literal_then_match() -> Result<(), Box<dyn std::error::Error>> {
    let blob = ababab_bits().finish(WIDTHS, 6, 0);

    let mut dest = [0u8; 6];
    let stats = decrunch_into(&blob, &mut dest)?;

    assert_eq!(&dest, b"ABABAB");
    assert_eq!(stats.literal_count, 2);
    assert_eq!(stats.match_count, 1);
    assert_eq!(stats.longest_match, 4);
    assert_eq!(stats.bytes_processed, 6);

    Ok(())
}

#[test]
fn test_skip_bits_are_discarded() -> Result<(), Box<dyn std::error::Error>> {
    for skip in [1u8, 5, 7, 8, 13] {
        let blob = ababab_bits().finish(WIDTHS, 6, skip);
        assert_eq!(CrunchHeader::parse(&blob)?.skip_bits, skip as u32);
        assert_eq!(decrunch(&blob)?, b"ABABAB", "skip {skip}");
    }
    Ok(())
}

#[test]
fn test_selector3_short_offset() -> Result<(), Box<dyn std::error::Error>> {
    let mut bits = BitEmitter::new();
    bits.put(0, 1).literal_count(1).put(b'x' as u32, 8);
    // selector 3, extra bit 0 forces a 7-bit offset, length 5 + 4
    bits.put(3, 2).put(0, 1).put(0, 7).put(4, 3);

    let out = decrunch(&bits.finish(WIDTHS, 10, 0))?;
    assert_eq!(out, vec![b'x'; 10]);
    Ok(())
}

#[test]
fn test_selector3_table_offset_and_extension() -> Result<(), Box<dyn std::error::Error>> {
    let mut bits = BitEmitter::new();
    bits.put(0, 1).literal_count(3);
    bits.put(b'c' as u32, 8)
        .put(b'b' as u32, 8)
        .put(b'a' as u32, 8);
    // selector 3, extra bit 1 keeps the table width (12), length 5 + 7 + 1
    bits.put(3, 2).put(1, 1).put(2, 12).put(7, 3).put(1, 3);

    let out = decrunch(&bits.finish(WIDTHS, 16, 0))?;
    let expected: Vec<u8> = (0..16).map(|i| b"abc"[(i + 2) % 3]).collect();
    assert_eq!(out, expected);
    assert_eq!(&out[13..], b"abc");
    Ok(())
}

#[test]
fn test_match_only_records() -> Result<(), Box<dyn std::error::Error>> {
    let mut bits = BitEmitter::new();
    bits.put(0, 1).literal_count(1).put(b'k' as u32, 8);
    bits.put(0, 2).put(0, 9);
    // control bit 1: straight to a selector-1 match
    bits.put(1, 1).put(1, 2).put(0, 10);

    let blob = bits.finish(WIDTHS, 6, 0);
    let mut dest = [0u8; 6];
    let stats = decrunch_into(&blob, &mut dest)?;
    assert_eq!(&dest, b"kkkkkk");
    assert_eq!(stats.match_count, 2);
    assert_eq!(stats.literal_count, 1);
    Ok(())
}

#[test]
fn test_long_literal_run() -> Result<(), Box<dyn std::error::Error>> {
    let data: Vec<u8> = (0..300u32).map(|i| (i * 7 + 3) as u8).collect();
    assert_eq!(decrunch(&literal_blob(&data))?, data);
    Ok(())
}

#[test]
fn test_offset_past_end_is_corrupt() {
    for offset in [1u32, 5, 511] {
        let mut bits = BitEmitter::new();
        bits.put(0, 1).literal_count(1).put(0x11, 8);
        bits.put(0, 2).put(offset, 9);

        let blob = bits.finish(WIDTHS, 4, 0);
        let mut dest = [0u8; 4];
        match decrunch_into(&blob, &mut dest) {
            Err(AssetError::CorruptStream(_)) => {}
            other => panic!("offset {offset}: unexpected result {other:?}"),
        }
    }
}

#[test]
fn test_match_overrunning_output_is_corrupt() {
    let mut bits = BitEmitter::new();
    bits.put(0, 1).literal_count(1).put(0x22, 8);
    // length 5 but only 2 bytes of room left
    bits.put(3, 2).put(0, 1).put(0, 7).put(0, 3);

    let blob = bits.finish(WIDTHS, 3, 0);
    assert!(matches!(decrunch(&blob), Err(AssetError::CorruptStream(_))));
}

#[test]
fn test_declared_length_mismatch() {
    let blob = ababab_bits().finish(WIDTHS, 6, 0);

    let mut small = [0xEEu8; 4];
    match decrunch_into(&blob, &mut small) {
        Err(AssetError::LengthMismatch { declared, expected }) => {
            assert_eq!(declared, 6);
            assert_eq!(expected, 4);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(small, [0xEE; 4]);

    assert!(matches!(
        decrunch_with_len(&blob, 5),
        Err(AssetError::LengthMismatch { .. })
    ));
}

#[test]
fn test_payload_exhausted_is_corrupt() {
    let mut bits = BitEmitter::new();
    bits.put(0, 1).literal_count(1).put(b'a' as u32, 8);

    // claims 4 bytes but the stream only carries one literal
    let blob = bits.finish(WIDTHS, 4, 0);
    let err = decrunch(&blob).unwrap_err();
    assert!(err.is_corrupt());
}

#[test]
fn test_unsupported_signatures() {
    for sig in [&b"PPLS"[..], b"PX20", b"PP11", b"\0\0\0\0"] {
        let mut blob = sig.to_vec();
        blob.extend_from_slice(&[0; 12]);
        assert!(
            matches!(decrunch(&blob), Err(AssetError::UnsupportedFormat { .. })),
            "signature {:?}",
            sig
        );
    }
}

#[test]
fn test_hex_fixture() -> Result<(), Box<dyn std::error::Error>> {
    // single literal 'Q' with 3 skip bits
    let blob = hex::decode("50503230090a0b0c228000000103")?;
    assert_eq!(decrunch(&blob)?, b"Q");
    Ok(())
}
