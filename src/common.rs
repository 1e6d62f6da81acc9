//! Common types and constants for legacy resource decoding
//!
//! This module defines the error type, the screen geometry shared by the
//! background and mask decoders, and the chunky pixel buffer produced by the
//! bitmap decoders.

use thiserror::Error;

/// Error type for resource decoding operations
#[derive(Debug, Error)]
pub enum AssetError {
    /// Signature names a crunch variant that has no decoder, or is unknown
    #[error("Unsupported format: signature {signature:08X}")]
    UnsupportedFormat {
        /// Big-endian signature read from the head of the blob
        signature: u32,
    },

    /// A structural invariant was violated while decoding
    #[error("Corrupt stream: {0}")]
    CorruptStream(String),

    /// The source ran dry before the implied payload was available
    #[error("Truncated input: expected {expected} bytes, got {actual}")]
    TruncatedInput {
        /// Number of bytes the decoder needed
        expected: usize,
        /// Number of bytes actually available
        actual: usize,
    },

    /// The length declared by the blob differs from the destination size
    #[error("Length mismatch: blob declares {declared} bytes, destination holds {expected}")]
    LengthMismatch {
        /// Decompressed length recorded in the blob trailer
        declared: usize,
        /// Destination capacity supplied by the caller
        expected: usize,
    },

    /// Image geometry or buffer sizes are inconsistent
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssetError {
    /// True for failures caused by damaged input rather than by the caller
    ///
    /// Loaders treat `CorruptStream` and `TruncatedInput` the same way: the
    /// partial buffer is discarded and the asset load is aborted.
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            AssetError::CorruptStream(_) | AssetError::TruncatedInput { .. }
        )
    }
}

/// Result type alias for decoding operations
pub type Result<T> = std::result::Result<T, AssetError>;

/// Width of the game screen in pixels
pub const SCREEN_WIDTH: usize = 320;

/// Height of the game screen in pixels
pub const SCREEN_HEIGHT: usize = 200;

/// Bytes per scanline of the depth mask (4 pixels per byte)
pub const SCREENMASK_WIDTH: usize = SCREEN_WIDTH / 4;

/// Bytes per scanline of the walkable-path mask (8 pixels per byte)
pub const SCREENPATH_WIDTH: usize = SCREEN_WIDTH / 8;

/// Number of colors in the base palette
pub const BASE_PALETTE_COLORS: usize = 32;

/// Size of the base palette block (RGB triplets)
pub const BASE_PALETTE_SIZE: usize = BASE_PALETTE_COLORS * 3;

/// Number of background depth layers
pub const LAYER_COUNT: usize = 4;

/// Chunky image: one byte per pixel, row-major, frames contiguous
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Number of frames stored back to back
    pub frames: usize,
    /// Pixel data, `frames * width * height` bytes
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap decoded pixel data, checking it matches the geometry
    pub fn new(width: usize, height: usize, frames: usize, data: Vec<u8>) -> Result<Self> {
        let expected = Self::byte_len(width, height, frames)?;
        if data.len() != expected {
            return Err(AssetError::InvalidDimensions(format!(
                "{frames} frame(s) of {width}x{height} need {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            frames,
            data,
        })
    }

    /// Number of bytes in one frame
    pub fn frame_len(&self) -> usize {
        self.width * self.height
    }

    /// Pixels of frame `index`, if present
    pub fn frame(&self, index: usize) -> Option<&[u8]> {
        if index >= self.frames {
            return None;
        }
        let len = self.frame_len();
        self.data.get(index * len..(index + 1) * len)
    }

    /// Total byte size of `frames` images of `width`x`height`, overflow-checked
    pub(crate) fn byte_len(width: usize, height: usize, frames: usize) -> Result<usize> {
        width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(frames))
            .ok_or_else(|| {
                AssetError::InvalidDimensions(format!(
                    "{frames} frame(s) of {width}x{height} overflow"
                ))
            })
    }
}
