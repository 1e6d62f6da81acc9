//! Two-plane depth mask builder
//!
//! On the planar platform the depth mask arrives as two 1-bit planes per
//! scanline, plane 0 followed by plane 1. Each plane nibble is expanded
//! through a lookup table so that the two planes' bits interleave into
//! 2-bit mask values, four pixels per output byte.

use crate::common::SCREEN_HEIGHT;
use crate::{AssetError, Result};

/// Bytes per plane per scanline on the target screen
pub const AMIGA_MASK_PLANE_WIDTH: usize = 40;

/// Expansion of a plane 0 nibble
pub const MASK_PLANE0: [u8; 16] = [
    0x00, 0x80, 0x20, 0xA0, 0x08, 0x84, 0x28, 0xA8, 0x02, 0x82, 0x22, 0xA2, 0x0A, 0x8A, 0x2A, 0xAA,
];

/// Expansion of a plane 1 nibble
pub const MASK_PLANE1: [u8; 16] = [
    0x00, 0x40, 0x10, 0x50, 0x04, 0x42, 0x14, 0x54, 0x01, 0x41, 0x11, 0x51, 0x05, 0x45, 0x15, 0x55,
];

/// Combine one byte from each plane into two mask bytes (high nibble first)
#[inline]
pub fn combine_planes(plane0: u8, plane1: u8) -> [u8; 2] {
    [
        MASK_PLANE0[(plane0 >> 4) as usize] | MASK_PLANE1[(plane1 >> 4) as usize],
        MASK_PLANE0[(plane0 & 0x0F) as usize] | MASK_PLANE1[(plane1 & 0x0F) as usize],
    ]
}

/// Rebuild a two-plane mask in place
///
/// `buf` holds rows of `2 * plane_width` bytes: plane 0 then plane 1. Each
/// row is replaced by `2 * plane_width` interleaved mask bytes.
pub fn build_mask(buf: &mut [u8], plane_width: usize) -> Result<()> {
    let row_len = plane_width * 2;
    if plane_width == 0 || buf.len() % row_len != 0 {
        return Err(AssetError::InvalidDimensions(format!(
            "mask buffer of {} bytes is not a whole number of {row_len}-byte rows",
            buf.len()
        )));
    }

    let mut planes = vec![0u8; row_len];
    for row in buf.chunks_exact_mut(row_len) {
        planes.copy_from_slice(row);
        let (plane0, plane1) = planes.split_at(plane_width);
        for (j, out) in row.chunks_exact_mut(2).enumerate() {
            out.copy_from_slice(&combine_planes(plane0[j], plane1[j]));
        }
    }
    Ok(())
}

/// Rebuild a full-screen mask of [`SCREEN_HEIGHT`] rows
pub fn build_screen_mask(buf: &mut [u8]) -> Result<()> {
    let expected = AMIGA_MASK_PLANE_WIDTH * 2 * SCREEN_HEIGHT;
    if buf.len() != expected {
        return Err(AssetError::InvalidDimensions(format!(
            "screen mask needs {expected} bytes, got {}",
            buf.len()
        )));
    }
    build_mask(buf, AMIGA_MASK_PLANE_WIDTH)
}
