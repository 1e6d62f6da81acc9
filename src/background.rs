//! Background, mask and path resources
//!
//! Chunky-platform backgrounds start with a fixed header (palette, layer
//! depths, palette-cycling records) followed by byte-run packed scanlines
//! whose bytes carry color, depth and path fields together. Separate `.msk`
//! files can add further depth and path data on top.
//!
//! Planar-platform masks and paths are crunched IFF files. Their headers are
//! skipped by fixed length, then the plane data is byte-run decoded.

use crate::common::{
    BASE_PALETTE_SIZE, LAYER_COUNT, SCREENMASK_WIDTH, SCREENPATH_WIDTH, SCREEN_HEIGHT,
    SCREEN_WIDTH,
};
use crate::crunch::maybe_decrunch;
use crate::mask::build_screen_mask;
use crate::rle::RunLengthDecoder;
use crate::scanline::{split_scanline, ScanlineFields};
use crate::{AssetError, Result};
use log::debug;

/// Number of palette-cycling records in a background header
pub const PALETTE_FX_COUNT: usize = 6;

/// Size of one palette-cycling record
pub const PALETTE_FX_SIZE: usize = 8;

/// Size of the background header preceding the packed scanlines
pub const BACKGROUND_HEADER_SIZE: usize =
    BASE_PALETTE_SIZE + LAYER_COUNT + PALETTE_FX_COUNT * PALETTE_FX_SIZE;

/// IFF header length skipped before planar mask data
pub const AMIGA_MASK_HEADER_SIZE: usize = 0x126;

/// IFF header length skipped before planar path data
pub const AMIGA_PATH_HEADER_SIZE: usize = 0x120;

/// One palette-cycling effect
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PaletteFx {
    /// Countdown between steps
    pub timer: u16,
    /// Amount added to the timer each frame
    pub step: u16,
    /// Effect flags
    pub flags: u16,
    /// First palette entry in the cycled range
    pub first: u8,
    /// Last palette entry in the cycled range
    pub last: u8,
}

impl PaletteFx {
    fn parse(record: &[u8; PALETTE_FX_SIZE]) -> Self {
        Self {
            timer: u16::from_be_bytes([record[0], record[1]]),
            step: u16::from_be_bytes([record[2], record[3]]),
            flags: u16::from_be_bytes([record[4], record[5]]),
            first: record[6],
            last: record[7],
        }
    }
}

/// Fixed header at the start of a background resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundHeader {
    /// Base palette, RGB triplets
    pub palette: [u8; BASE_PALETTE_SIZE],
    /// Depth value of each background layer
    pub layers: [u8; LAYER_COUNT],
    /// Palette-cycling effects
    pub palette_fx: [PaletteFx; PALETTE_FX_COUNT],
}

impl BackgroundHeader {
    /// Parse the header at the start of `data`
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < BACKGROUND_HEADER_SIZE {
            return Err(AssetError::TruncatedInput {
                expected: BACKGROUND_HEADER_SIZE,
                actual: data.len(),
            });
        }

        let mut palette = [0u8; BASE_PALETTE_SIZE];
        palette.copy_from_slice(&data[..BASE_PALETTE_SIZE]);

        let layers = read_layers(&data[BASE_PALETTE_SIZE..])?;

        let mut palette_fx = [PaletteFx::default(); PALETTE_FX_COUNT];
        let records = &data[BASE_PALETTE_SIZE + LAYER_COUNT..BACKGROUND_HEADER_SIZE];
        for (fx, record) in palette_fx
            .iter_mut()
            .zip(records.chunks_exact(PALETTE_FX_SIZE))
        {
            let mut raw = [0u8; PALETTE_FX_SIZE];
            raw.copy_from_slice(record);
            *fx = PaletteFx::parse(&raw);
        }

        Ok(Self {
            palette,
            layers,
            palette_fx,
        })
    }
}

/// Decoded background: header plus the three screen fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Background {
    /// Palette, depths and palette effects
    pub header: BackgroundHeader,
    /// Color, mask and path buffers for the whole screen
    pub fields: ScanlineFields,
}

fn read_layers(data: &[u8]) -> Result<[u8; LAYER_COUNT]> {
    let bytes = data.get(..LAYER_COUNT).ok_or(AssetError::TruncatedInput {
        expected: LAYER_COUNT,
        actual: data.len(),
    })?;
    let mut layers = [0u8; LAYER_COUNT];
    layers.copy_from_slice(bytes);
    Ok(layers)
}

fn take<'a>(data: &'a [u8], start: usize, len: usize) -> Result<&'a [u8]> {
    data.get(start..start + len)
        .ok_or(AssetError::TruncatedInput {
            expected: start + len,
            actual: data.len(),
        })
}

/// Decode a chunky-platform background resource
pub fn decode_background(data: &[u8]) -> Result<Background> {
    let header = BackgroundHeader::parse(data)?;
    debug!("background layers {:?}", header.layers);

    let mut fields = ScanlineFields::screen();
    let mut decoder = RunLengthDecoder::new(&data[BACKGROUND_HEADER_SIZE..]);
    let mut scanline = [0u8; SCREEN_WIDTH];

    for y in 0..SCREEN_HEIGHT {
        decoder.fill(&mut scanline)?;
        let row = fields.row_mut(y).ok_or_else(|| {
            AssetError::InvalidDimensions(format!("scanline {y} outside screen"))
        })?;
        split_scanline(&scanline, row)?;
    }

    Ok(Background { header, fields })
}

/// Merge a chunky-platform `.msk` resource into `fields`
///
/// The file holds four layer depths, the raw path plane and the raw mask
/// plane. Both planes are ORed into the existing buffers. Returns the depths.
pub fn decode_mask_and_path(data: &[u8], fields: &mut ScanlineFields) -> Result<[u8; LAYER_COUNT]> {
    let path_len = SCREENPATH_WIDTH * SCREEN_HEIGHT;
    let mask_len = SCREENMASK_WIDTH * SCREEN_HEIGHT;
    if fields.path.len() != path_len || fields.mask.len() != mask_len {
        return Err(AssetError::InvalidDimensions(
            "mask and path files cover the full screen only".to_string(),
        ));
    }

    let layers = read_layers(data)?;
    let path = take(data, LAYER_COUNT, path_len)?;
    let mask = take(data, LAYER_COUNT + path_len, mask_len)?;

    for (dst, src) in fields.path.iter_mut().zip(path) {
        *dst |= src;
    }
    for (dst, src) in fields.mask.iter_mut().zip(mask) {
        *dst |= src;
    }

    debug!("mask and path merged, layers {layers:?}");
    Ok(layers)
}

fn decode_planar_plane(data: &[u8], header_len: usize, len: usize) -> Result<Vec<u8>> {
    let data = maybe_decrunch(data)?;
    let packed = data.get(header_len..).ok_or(AssetError::TruncatedInput {
        expected: header_len,
        actual: data.len(),
    })?;
    let mut plane = vec![0u8; len];
    RunLengthDecoder::new(packed).fill(&mut plane)?;
    Ok(plane)
}

/// Decode a planar-platform depth mask resource into packed 2-bit values
pub fn decode_amiga_mask(data: &[u8]) -> Result<Vec<u8>> {
    let mut mask = decode_planar_plane(
        data,
        AMIGA_MASK_HEADER_SIZE,
        SCREENMASK_WIDTH * SCREEN_HEIGHT,
    )?;
    build_screen_mask(&mut mask)?;
    Ok(mask)
}

/// Decode a planar-platform walkable-path resource
pub fn decode_amiga_path(data: &[u8]) -> Result<Vec<u8>> {
    decode_planar_plane(
        data,
        AMIGA_PATH_HEADER_SIZE,
        SCREENPATH_WIDTH * SCREEN_HEIGHT,
    )
}
