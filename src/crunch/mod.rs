//! PowerPacker "crunched" blob decompression
//!
//! A crunched blob is laid out as
//!
//! ```text
//! [signature: 4 BE][offset widths: 4][payload ...][trailer: 4 BE]
//! ```
//!
//! where the trailer holds `(decompressed_length << 8) | skip_bits`. The
//! payload is a bitstream read backward from its last byte, and the output
//! is produced backward from its last byte as well.
//!
//! Only the `PP20` variant is decoded. `PPLS` and `PX20` are recognized so
//! they can be rejected with a precise error.

mod bits;
mod decoder;

pub use bits::{BackwardBitReader, MAX_GROUP_BITS};

use crate::{AssetError, Result};
use log::{debug, warn};
use std::borrow::Cow;

/// `PP20` signature
pub const PP20_SIGNATURE: u32 = 0x5050_3230;

/// `PPLS` signature (encrypted variant)
pub const PPLS_SIGNATURE: u32 = 0x5050_4C53;

/// `PX20` signature (password-protected variant)
pub const PX20_SIGNATURE: u32 = 0x5058_3230;

/// Length of the signature field
pub const SIGNATURE_SIZE: usize = 4;

/// Number of entries in the inline offset-width table
pub const OFFSET_WIDTH_TABLE_SIZE: usize = 4;

/// Length of the trailer holding the decompressed length and skip count
pub const TRAILER_SIZE: usize = 4;

/// Smallest well-formed blob: signature, table and trailer with an empty payload
pub const MIN_BLOB_SIZE: usize = SIGNATURE_SIZE + OFFSET_WIDTH_TABLE_SIZE + TRAILER_SIZE;

/// Offset width used by selector 3 when its extra bit is 0
pub const SHORT_OFFSET_BITS: u32 = 7;

/// Crunch variants identified by their leading signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrunchType {
    /// Plain PowerPacker 2.0 data
    Pp20,
    /// Encrypted PowerPacker data
    Ppls,
    /// Password-protected PowerPacker data
    Px20,
}

impl CrunchType {
    /// Map a big-endian signature to a variant, `None` if it is not a crunch signature
    pub fn detect(signature: u32) -> Option<Self> {
        match signature {
            PP20_SIGNATURE => Some(CrunchType::Pp20),
            PPLS_SIGNATURE => Some(CrunchType::Ppls),
            PX20_SIGNATURE => Some(CrunchType::Px20),
            _ => None,
        }
    }

    /// Whether a decoder exists for this variant
    pub fn is_supported(&self) -> bool {
        matches!(self, CrunchType::Pp20)
    }

    /// Signature as it appears in the file
    pub fn signature(&self) -> u32 {
        match self {
            CrunchType::Pp20 => PP20_SIGNATURE,
            CrunchType::Ppls => PPLS_SIGNATURE,
            CrunchType::Px20 => PX20_SIGNATURE,
        }
    }
}

/// Read the big-endian signature at the head of `data`
pub fn read_signature(data: &[u8]) -> Option<u32> {
    let bytes: [u8; SIGNATURE_SIZE] = data.get(..SIGNATURE_SIZE)?.try_into().ok()?;
    Some(u32::from_be_bytes(bytes))
}

/// Parsed framing of a supported crunched blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrunchHeader {
    /// Detected variant (always [`CrunchType::Pp20`] once parsed)
    pub crunch_type: CrunchType,
    /// Offset bit widths indexed by the 2-bit match selector
    pub offset_widths: [u8; OFFSET_WIDTH_TABLE_SIZE],
    /// Decompressed length from the trailer
    pub decompressed_len: usize,
    /// Bits discarded from the end of the payload before decoding
    pub skip_bits: u32,
    /// Length of the bitstream between table and trailer
    pub payload_len: usize,
}

impl CrunchHeader {
    /// Parse the signature, offset table and trailer of `blob`
    pub fn parse(blob: &[u8]) -> Result<Self> {
        let signature = read_signature(blob).ok_or(AssetError::TruncatedInput {
            expected: SIGNATURE_SIZE,
            actual: blob.len(),
        })?;

        let crunch_type = match CrunchType::detect(signature) {
            Some(CrunchType::Pp20) => CrunchType::Pp20,
            Some(other) => {
                warn!("{other:?} crunched data is not supported");
                return Err(AssetError::UnsupportedFormat { signature });
            }
            None => return Err(AssetError::UnsupportedFormat { signature }),
        };

        if blob.len() < MIN_BLOB_SIZE {
            return Err(AssetError::TruncatedInput {
                expected: MIN_BLOB_SIZE,
                actual: blob.len(),
            });
        }

        let mut offset_widths = [0u8; OFFSET_WIDTH_TABLE_SIZE];
        offset_widths.copy_from_slice(&blob[SIGNATURE_SIZE..SIGNATURE_SIZE + OFFSET_WIDTH_TABLE_SIZE]);

        let trailer_start = blob.len() - TRAILER_SIZE;
        let trailer = u32::from_be_bytes([
            blob[trailer_start],
            blob[trailer_start + 1],
            blob[trailer_start + 2],
            blob[trailer_start + 3],
        ]);

        Ok(Self {
            crunch_type,
            offset_widths,
            decompressed_len: (trailer >> 8) as usize,
            skip_bits: trailer & 0xFF,
            payload_len: trailer_start - SIGNATURE_SIZE - OFFSET_WIDTH_TABLE_SIZE,
        })
    }

    /// The bitstream portion of `blob`
    pub fn payload<'a>(&self, blob: &'a [u8]) -> &'a [u8] {
        let start = SIGNATURE_SIZE + OFFSET_WIDTH_TABLE_SIZE;
        &blob[start..start + self.payload_len]
    }
}

/// Statistics for a decrunch operation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DecrunchStats {
    /// Number of literal bytes decoded
    pub literal_count: usize,
    /// Number of back-references decoded
    pub match_count: usize,
    /// Total bytes written to the destination
    pub bytes_processed: usize,
    /// Longest back-reference
    pub longest_match: usize,
    /// Payload bits left unread when the output was full
    pub bits_left: usize,
}

/// Decrunch `blob` into `dest`, whose length must equal the declared length
///
/// Nothing is written when the lengths differ.
pub fn decrunch_into(blob: &[u8], dest: &mut [u8]) -> Result<DecrunchStats> {
    let header = CrunchHeader::parse(blob)?;
    if header.decompressed_len != dest.len() {
        return Err(AssetError::LengthMismatch {
            declared: header.decompressed_len,
            expected: dest.len(),
        });
    }

    debug!(
        "decrunching {} payload bytes into {} (widths {:?}, skip {})",
        header.payload_len, header.decompressed_len, header.offset_widths, header.skip_bits
    );

    let stats = decoder::decrunch_payload(
        header.payload(blob),
        &header.offset_widths,
        header.skip_bits,
        dest,
    )?;

    debug!(
        "decrunched {} bytes: {} literals, {} matches",
        stats.bytes_processed, stats.literal_count, stats.match_count
    );
    Ok(stats)
}

/// Decrunch `blob`, requiring its declared length to be `expected_len`
pub fn decrunch_with_len(blob: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let header = CrunchHeader::parse(blob)?;
    if header.decompressed_len != expected_len {
        return Err(AssetError::LengthMismatch {
            declared: header.decompressed_len,
            expected: expected_len,
        });
    }
    let mut output = vec![0u8; expected_len];
    decrunch_into(blob, &mut output)?;
    Ok(output)
}

/// Decrunch `blob` into a buffer sized from its trailer
pub fn decrunch(blob: &[u8]) -> Result<Vec<u8>> {
    let header = CrunchHeader::parse(blob)?;
    decrunch_with_len(blob, header.decompressed_len)
}

/// Decrunch `data` if it starts with a crunch signature, otherwise hand it back untouched
///
/// Recognized but unsupported variants still fail with `UnsupportedFormat`.
pub fn maybe_decrunch(data: &[u8]) -> Result<Cow<'_, [u8]>> {
    match read_signature(data).and_then(CrunchType::detect) {
        Some(_) => Ok(Cow::Owned(decrunch(data)?)),
        None => Ok(Cow::Borrowed(data)),
    }
}
