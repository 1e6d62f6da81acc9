//! Background scanline field splitting
//!
//! Background pixels are stored one byte each with three fields packed in:
//!
//! - bit 7: walkable path
//! - bits 6-5: depth mask
//! - bits 4-0: color index
//!
//! Splitting ORs each field into its own buffer. Loaders may layer several
//! mask/path sources into the same buffers, so nothing is ever overwritten.

use crate::common::{SCREENMASK_WIDTH, SCREENPATH_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::{AssetError, Result};

/// Bit holding the walkable-path flag
pub const PATH_BIT: u8 = 0x80;

/// Bits holding the depth mask value
pub const MASK_BITS: u8 = 0x60;

/// Bits holding the color index
pub const COLOR_BITS: u8 = 0x1F;

/// Mutable view of one scanline in each of the three field buffers
#[derive(Debug)]
pub struct ScanlineFieldsMut<'a> {
    /// One byte per pixel
    pub color: &'a mut [u8],
    /// Two bits per pixel, four pixels per byte
    pub mask: &'a mut [u8],
    /// One bit per pixel, eight pixels per byte
    pub path: &'a mut [u8],
}

/// Split one packed scanline into color, mask and path fields
pub fn split_scanline(src: &[u8], fields: ScanlineFieldsMut<'_>) -> Result<()> {
    let width = src.len();
    let mask_len = width.div_ceil(4);
    let path_len = width.div_ceil(8);
    if fields.color.len() < width || fields.mask.len() < mask_len || fields.path.len() < path_len
    {
        return Err(AssetError::InvalidDimensions(format!(
            "scanline of {width} pixels needs {width}/{mask_len}/{path_len} bytes, got {}/{}/{}",
            fields.color.len(),
            fields.mask.len(),
            fields.path.len()
        )));
    }

    for (i, &byte) in src.iter().enumerate() {
        fields.path[i / 8] |= ((byte & PATH_BIT) >> 7) << (i & 7);
        fields.mask[i / 4] |= ((byte & MASK_BITS) >> 5) << ((i & 3) << 1);
        fields.color[i] |= byte & COLOR_BITS;
    }

    Ok(())
}

/// Full-screen color, mask and path buffers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanlineFields {
    /// Width in pixels
    pub width: usize,
    /// Height in scanlines
    pub height: usize,
    /// Color indices, `width` bytes per row
    pub color: Vec<u8>,
    /// Depth mask, `width / 4` bytes per row
    pub mask: Vec<u8>,
    /// Walkable path, `width / 8` bytes per row
    pub path: Vec<u8>,
}

impl ScanlineFields {
    /// Zeroed buffers for a `width`x`height` screen; `width` must be a multiple of 8
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width % 8 != 0 {
            return Err(AssetError::InvalidDimensions(format!(
                "field width {width} is not a multiple of 8"
            )));
        }
        Ok(Self {
            width,
            height,
            color: vec![0; width * height],
            mask: vec![0; width / 4 * height],
            path: vec![0; width / 8 * height],
        })
    }

    /// Zeroed buffers for the game screen
    pub fn screen() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            color: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT],
            mask: vec![0; SCREENMASK_WIDTH * SCREEN_HEIGHT],
            path: vec![0; SCREENPATH_WIDTH * SCREEN_HEIGHT],
        }
    }

    /// Bytes per row of the mask buffer
    pub fn mask_pitch(&self) -> usize {
        self.width / 4
    }

    /// Bytes per row of the path buffer
    pub fn path_pitch(&self) -> usize {
        self.width / 8
    }

    /// Views into row `y` of all three buffers
    pub fn row_mut(&mut self, y: usize) -> Option<ScanlineFieldsMut<'_>> {
        if y >= self.height {
            return None;
        }
        let (w, m, p) = (self.width, self.mask_pitch(), self.path_pitch());
        Some(ScanlineFieldsMut {
            color: &mut self.color[y * w..(y + 1) * w],
            mask: &mut self.mask[y * m..(y + 1) * m],
            path: &mut self.path[y * p..(y + 1) * p],
        })
    }

    /// Path flag of pixel (`x`, `y`)
    pub fn path_at(&self, x: usize, y: usize) -> bool {
        let byte = self.path[y * self.path_pitch() + x / 8];
        (byte >> (x & 7)) & 1 != 0
    }

    /// Depth mask value of pixel (`x`, `y`)
    pub fn mask_at(&self, x: usize, y: usize) -> u8 {
        let byte = self.mask[y * self.mask_pitch() + x / 4];
        (byte >> ((x & 3) << 1)) & 0x03
    }

    /// Color index of pixel (`x`, `y`)
    pub fn color_at(&self, x: usize, y: usize) -> u8 {
        self.color[y * self.width + x]
    }
}
