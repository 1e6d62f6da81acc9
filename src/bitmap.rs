//! Bitmap resources: sprite sheets and static images
//!
//! Both platforms share a three-byte header, `[frames][width][height]`.
//! Single-image resources keep the first byte but ignore it. The pixel data
//! that follows is byte-run packed chunky pixels on one platform and raw
//! bit-planes on the other.

use crate::common::PixelBuffer;
use crate::planar::unpack_bitmap;
use crate::rle::RunLengthDecoder;
use crate::{AssetError, Result};
use log::debug;

/// Size of the `[frames][width][height]` header
pub const BITMAP_HEADER_SIZE: usize = 3;

/// How the leading byte of a bitmap resource is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameHeader {
    /// First byte holds the frame count (sprite sheets, fonts, talk heads)
    Multi,
    /// First byte is ignored and the resource holds one image
    Single,
}

/// Dimensions read from the resource header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapHeader {
    /// Number of frames
    pub frames: usize,
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
}

impl BitmapHeader {
    /// Parse the header at the start of `data`
    pub fn parse(data: &[u8], layout: FrameHeader) -> Result<Self> {
        if data.len() < BITMAP_HEADER_SIZE {
            return Err(AssetError::TruncatedInput {
                expected: BITMAP_HEADER_SIZE,
                actual: data.len(),
            });
        }
        let frames = match layout {
            FrameHeader::Multi => data[0] as usize,
            FrameHeader::Single => 1,
        };
        Ok(Self {
            frames,
            width: data[1] as usize,
            height: data[2] as usize,
        })
    }

    /// Bytes of chunky pixel data described by this header
    pub fn pixel_len(&self) -> Result<usize> {
        PixelBuffer::byte_len(self.width, self.height, self.frames)
    }
}

/// Decode a bit-plane bitmap resource with `plane_count` planes per frame
///
/// The width must be a multiple of 8.
pub fn decode_planar(data: &[u8], layout: FrameHeader, plane_count: usize) -> Result<PixelBuffer> {
    let header = BitmapHeader::parse(data, layout)?;

    if header.width % 8 != 0 {
        return Err(AssetError::InvalidDimensions(format!(
            "planar width {} is not a multiple of 8",
            header.width
        )));
    }

    let plane_size = header.width / 8 * header.height;
    debug!(
        "planar bitmap: {} frame(s) of {}x{}, {plane_count} planes",
        header.frames, header.width, header.height
    );

    let mut pixels = vec![0u8; header.pixel_len()?];
    unpack_bitmap(
        &mut pixels,
        &data[BITMAP_HEADER_SIZE..],
        header.frames,
        plane_size,
        plane_count,
    )?;

    PixelBuffer::new(header.width, header.height, header.frames, pixels)
}

/// Decode a byte-run packed chunky bitmap resource
pub fn decode_rle_bitmap(data: &[u8], layout: FrameHeader) -> Result<PixelBuffer> {
    let header = BitmapHeader::parse(data, layout)?;
    debug!(
        "packed bitmap: {} frame(s) of {}x{}",
        header.frames, header.width, header.height
    );

    let mut pixels = vec![0u8; header.pixel_len()?];
    RunLengthDecoder::new(&data[BITMAP_HEADER_SIZE..]).fill(&mut pixels)?;

    PixelBuffer::new(header.width, header.height, header.frames, pixels)
}
