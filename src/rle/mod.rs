//! Byte-run (RLE) decompression
//!
//! Records are a control byte followed by a payload:
//!
//! - `0..=127`: literal run, the next `b + 1` bytes are copied verbatim
//! - `129..=255`: replicate run, the next byte is written `(256 - b) + 1` times
//! - `128`: no action, nothing further is consumed or produced
//!
//! The stream has no header and no terminator; it ends when the source does.

mod reader;
mod state;

pub use reader::RunLengthDecoder;
pub use state::Remainder;

use crate::Result;

/// Input buffer size for the decoder (2048 bytes)
pub const IN_BUFF_SIZE: usize = 0x800;

/// Longest expansion of a single record (literal `0x7F` or replicate `0x81`)
pub const MAX_RUN_LENGTH: usize = 0x80;

/// Highest control byte that starts a literal run
pub const LITERAL_MAX: u8 = 0x7F;

/// Control byte with no defined transform
pub const NOOP_CONTROL: u8 = 0x80;

/// Decode exactly `len` bytes of byte-run data from memory
pub fn decode_rle(data: &[u8], len: usize) -> Result<Vec<u8>> {
    let mut decoder = RunLengthDecoder::new(data);
    let mut output = vec![0u8; len];
    decoder.fill(&mut output)?;
    Ok(output)
}

/// Classify a control byte into the length of the run it starts
///
/// Returns `None` for [`NOOP_CONTROL`].
pub fn run_length(control: u8) -> Option<usize> {
    match control {
        0..=LITERAL_MAX => Some(control as usize + 1),
        NOOP_CONTROL => None,
        _ => Some((256 - control as usize) + 1),
    }
}
