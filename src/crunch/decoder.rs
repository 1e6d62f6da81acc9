//! Literal and match decoding for PP20 payloads
//!
//! The output is filled from its last byte toward its first. Positions are
//! plain indices into the destination slice and every step toward the start
//! is checked before it is taken.

use super::bits::BackwardBitReader;
use super::{DecrunchStats, OFFSET_WIDTH_TABLE_SIZE, SHORT_OFFSET_BITS};
use crate::{AssetError, Result};
use log::trace;

/// Backward output cursor over a caller-sized destination
#[derive(Debug)]
struct OutputCursor<'a> {
    dest: &'a mut [u8],
    /// Index of the most recently written byte; `dest.len()` before the first write
    pos: usize,
}

impl<'a> OutputCursor<'a> {
    fn new(dest: &'a mut [u8]) -> Self {
        let pos = dest.len();
        Self { dest, pos }
    }

    fn is_full(&self) -> bool {
        self.pos == 0
    }

    fn written(&self) -> usize {
        self.dest.len() - self.pos
    }

    fn put(&mut self, byte: u8) -> Result<()> {
        if self.pos == 0 {
            return Err(AssetError::CorruptStream(
                "output overrun past start of destination".to_string(),
            ));
        }
        self.pos -= 1;
        self.dest[self.pos] = byte;
        Ok(())
    }

    /// Copy `length` bytes from `offset` bytes above the current position
    fn copy_match(&mut self, offset: usize, length: usize) -> Result<()> {
        let source = self.pos.checked_add(offset);
        match source {
            Some(source) if source < self.dest.len() => {}
            _ => {
                return Err(AssetError::CorruptStream(format!(
                    "back-reference offset {offset} at position {} points past end of output ({})",
                    self.pos,
                    self.dest.len()
                )));
            }
        }

        for _ in 0..length {
            // pos only decreases, so pos + offset stays below dest.len()
            let byte = self.dest[self.pos + offset];
            self.put(byte)?;
        }
        Ok(())
    }
}

/// Read a count extension: groups of `bits` bits summed until one is below its maximum
fn read_extension(bits: &mut BackwardBitReader<'_>, width: u32) -> Result<usize> {
    let max = (1u32 << width) - 1;
    let mut total = 0usize;
    loop {
        let group = bits.read_bits(width)?;
        total += group as usize;
        if group != max {
            return Ok(total);
        }
    }
}

/// Decode a PP20 payload into `dest`, which must be sized to the declared length
pub(crate) fn decrunch_payload(
    payload: &[u8],
    offset_widths: &[u8; OFFSET_WIDTH_TABLE_SIZE],
    skip_bits: u32,
    dest: &mut [u8],
) -> Result<DecrunchStats> {
    let mut bits = BackwardBitReader::new(payload);
    let mut out = OutputCursor::new(dest);
    let mut stats = DecrunchStats::default();

    bits.skip(skip_bits)?;

    while !out.is_full() {
        // 0: literal run followed by a match, 1: match only
        if bits.read_bit()? == 0 {
            let count = 1 + read_extension(&mut bits, 2)?;
            for _ in 0..count {
                let byte = bits.read_bits(8)? as u8;
                out.put(byte)?;
            }
            stats.literal_count += count;

            if out.is_full() {
                break;
            }
        }

        let selector = bits.read_bits(2)? as usize;
        let mut offset_bits = offset_widths[selector] as u32;
        let mut length = selector + 2;

        let offset = if selector == 3 {
            if bits.read_bit()? == 0 {
                offset_bits = SHORT_OFFSET_BITS;
            }
            let offset = bits.read_bits(offset_bits)? as usize;
            length += read_extension(&mut bits, 3)?;
            offset
        } else {
            bits.read_bits(offset_bits)? as usize
        };

        trace!(
            "match selector {selector} offset {offset} length {length} at {}",
            out.written()
        );
        out.copy_match(offset, length)?;

        stats.match_count += 1;
        stats.longest_match = stats.longest_match.max(length);
    }

    stats.bytes_processed = out.written();
    stats.bits_left = bits.remaining_bits();
    Ok(stats)
}
