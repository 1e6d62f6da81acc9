//! Planar to chunky bitmap conversion
//!
//! Planar resources store each bit of a pixel in its own bitmap. For every
//! frame the planes follow one another, each `plane_size` bytes long, and
//! frames are concatenated. Unpacking yields one byte per pixel whose bit `p`
//! comes from plane `p`.

use crate::{AssetError, Result};

/// Plane count used by the target platform's sprites and statics
pub const DEFAULT_PLANE_COUNT: usize = 5;

/// Highest plane count that fits in a chunky byte
pub const MAX_PLANE_COUNT: usize = 8;

/// Convert `frames` frames of `plane_count` bit-planes into chunky pixels
///
/// `src` holds `frames * plane_count * plane_size` bytes; `dst` receives
/// `frames * plane_size * 8` bytes, frame-major. Pixels are taken most
/// significant bit first from each plane byte.
pub fn unpack_bitmap(
    dst: &mut [u8],
    src: &[u8],
    frames: usize,
    plane_size: usize,
    plane_count: usize,
) -> Result<()> {
    if plane_count == 0 || plane_count > MAX_PLANE_COUNT {
        return Err(AssetError::InvalidDimensions(format!(
            "plane count {plane_count} outside 1..={MAX_PLANE_COUNT}"
        )));
    }
    if frames == 0 || plane_size == 0 {
        return Ok(());
    }

    let frame_src = plane_size
        .checked_mul(plane_count)
        .ok_or_else(|| AssetError::InvalidDimensions("plane data size overflow".to_string()))?;
    let needed_src = frame_src
        .checked_mul(frames)
        .ok_or_else(|| AssetError::InvalidDimensions("plane data size overflow".to_string()))?;
    if src.len() < needed_src {
        return Err(AssetError::TruncatedInput {
            expected: needed_src,
            actual: src.len(),
        });
    }

    let frame_dst = plane_size * 8;
    let needed_dst = frame_dst * frames;
    if dst.len() < needed_dst {
        return Err(AssetError::InvalidDimensions(format!(
            "destination holds {} bytes, {needed_dst} needed",
            dst.len()
        )));
    }

    for (frame_in, frame_out) in src
        .chunks_exact(frame_src)
        .zip(dst.chunks_exact_mut(frame_dst))
        .take(frames)
    {
        for (j, pixels) in frame_out.chunks_exact_mut(8).enumerate() {
            for (k, pixel) in pixels.iter_mut().enumerate() {
                let mask = 0x80u8 >> k;
                let mut value = 0u8;
                for plane in 0..plane_count {
                    if frame_in[j + plane * plane_size] & mask != 0 {
                        value |= 1 << plane;
                    }
                }
                *pixel = value;
            }
        }
    }

    Ok(())
}
