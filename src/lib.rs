//! crunchkit - decoders for legacy adventure-game resources
//!
//! This crate decodes the packed resources of a late-80s point-and-click
//! engine, byte-exact with the original loaders. It covers the two
//! decompression front-ends and the pixel reassembly steps that follow them:
//!
//! - Byte-run (RLE) streams, resumable across arbitrarily sized reads
//! - PowerPacker `PP20` crunched blobs (backward bitstream LZ)
//! - Planar bitmaps converted to one byte per pixel
//! - Background scanlines split into color, depth mask and walkable path
//! - Two-plane depth masks rebuilt through nibble lookup tables
//!
//! Opening archives, palettes and presentation are left to the caller: every
//! function here takes bytes and returns typed buffers.
//!
//! # Example - Decrunching
//!
//! ```no_run
//! use crunchkit::{decrunch, CrunchHeader};
//!
//! let blob = std::fs::read("location.loc.pp")?;
//! let header = CrunchHeader::parse(&blob)?;
//! let data = decrunch(&blob)?;
//! assert_eq!(data.len(), header.decompressed_len);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Example - Streaming byte-run data
//!
//! ```
//! use crunchkit::RunLengthDecoder;
//! use std::io::Read;
//!
//! let packed: &[u8] = &[0x02, b'a', b'b', b'c', 0xFE, b'z'];
//! let mut decoder = RunLengthDecoder::new(packed);
//!
//! let mut head = [0u8; 2];
//! decoder.read_exact(&mut head)?;
//! assert_eq!(&head, b"ab");
//!
//! let mut rest = Vec::new();
//! decoder.read_to_end(&mut rest)?;
//! assert_eq!(rest, b"czzz");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod background;
pub mod bitmap;
pub mod common;
pub mod crunch;
pub mod error;
pub mod mask;
pub mod planar;
pub mod rle;
pub mod scanline;

// Re-export commonly used types
pub use background::{
    decode_amiga_mask, decode_amiga_path, decode_background, decode_mask_and_path, Background,
    BackgroundHeader, PaletteFx,
};
pub use bitmap::{decode_planar, decode_rle_bitmap, BitmapHeader, FrameHeader};
pub use common::{
    AssetError, PixelBuffer, Result, SCREENMASK_WIDTH, SCREENPATH_WIDTH, SCREEN_HEIGHT,
    SCREEN_WIDTH,
};
pub use crunch::{
    decrunch, decrunch_into, decrunch_with_len, maybe_decrunch, CrunchHeader, CrunchType,
    DecrunchStats,
};
pub use mask::{build_mask, MASK_PLANE0, MASK_PLANE1};
pub use planar::unpack_bitmap;
pub use rle::{decode_rle, RunLengthDecoder};
pub use scanline::{split_scanline, ScanlineFields, ScanlineFieldsMut};
