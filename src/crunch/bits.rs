//! Backward bit reader
//!
//! Crunched payloads are consumed from the last byte toward the first. Bits
//! of each byte are taken least significant first, and a group of `n` bits
//! is assembled with the first bit read as its most significant bit.

use crate::{AssetError, Result};

/// Widest group a single `read_bits` call may return
pub const MAX_GROUP_BITS: u32 = 32;

/// Fallible bit reader walking a payload from its end toward its start
#[derive(Debug, Clone)]
pub struct BackwardBitReader<'a> {
    data: &'a [u8],
    /// Bytes `data[..pos]` have not been loaded yet
    pos: usize,
    bit_buff: u8,
    bits_left: u32,
}

impl<'a> BackwardBitReader<'a> {
    /// Create a reader positioned after the last byte of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: data.len(),
            bit_buff: 0,
            bits_left: 0,
        }
    }

    /// Number of bits still available
    pub fn remaining_bits(&self) -> usize {
        self.pos * 8 + self.bits_left as usize
    }

    /// Read a single bit
    pub fn read_bit(&mut self) -> Result<u32> {
        if self.bits_left == 0 {
            if self.pos == 0 {
                return Err(AssetError::CorruptStream(
                    "compressed payload exhausted".to_string(),
                ));
            }
            self.pos -= 1;
            self.bit_buff = self.data[self.pos];
            self.bits_left = 8;
        }

        let bit = (self.bit_buff & 1) as u32;
        self.bit_buff >>= 1;
        self.bits_left -= 1;
        Ok(bit)
    }

    /// Read a group of `n` bits, first bit read ending up most significant
    pub fn read_bits(&mut self, n: u32) -> Result<u32> {
        if n > MAX_GROUP_BITS {
            return Err(AssetError::CorruptStream(format!(
                "bit group of {n} bits is wider than {MAX_GROUP_BITS}"
            )));
        }
        if (n as usize) > self.remaining_bits() {
            return Err(AssetError::CorruptStream(format!(
                "need {n} bits, only {} left",
                self.remaining_bits()
            )));
        }

        let mut value = 0u32;
        for _ in 0..n {
            value = (value << 1) | self.read_bit()?;
        }
        Ok(value)
    }

    /// Discard `n` bits
    pub fn skip(&mut self, n: u32) -> Result<()> {
        if (n as usize) > self.remaining_bits() {
            return Err(AssetError::CorruptStream(format!(
                "cannot skip {n} bits, only {} left",
                self.remaining_bits()
            )));
        }
        for _ in 0..n {
            self.read_bit()?;
        }
        Ok(())
    }
}
