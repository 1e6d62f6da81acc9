//! Decoder state management
//!
//! Holds the input buffer and the bounded remainder used to carry the
//! unread tail of a record across `read` calls.

use super::{IN_BUFF_SIZE, MAX_RUN_LENGTH};
use crate::{AssetError, Result};
use std::io::{ErrorKind, Read};

/// Fixed-capacity FIFO holding decoded bytes that did not fit the caller's buffer
#[derive(Debug)]
pub struct Remainder {
    buf: [u8; MAX_RUN_LENGTH],
    start: usize,
    end: usize,
}

impl Remainder {
    /// Create an empty remainder
    pub fn new() -> Self {
        Self {
            buf: [0; MAX_RUN_LENGTH],
            start: 0,
            end: 0,
        }
    }

    /// Number of buffered bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Append one byte, failing if a record ever expands past capacity
    pub fn push(&mut self, byte: u8) -> Result<()> {
        if self.end >= self.buf.len() {
            return Err(AssetError::CorruptStream(format!(
                "run remainder overflow ({} bytes)",
                self.buf.len()
            )));
        }
        self.buf[self.end] = byte;
        self.end += 1;
        Ok(())
    }

    /// Move as many buffered bytes as fit into `dst`, returning the count
    pub fn drain_into(&mut self, dst: &mut [u8]) -> usize {
        let count = dst.len().min(self.len());
        dst[..count].copy_from_slice(&self.buf[self.start..self.start + count]);
        self.start += count;
        if self.start == self.end {
            self.start = 0;
            self.end = 0;
        }
        count
    }
}

impl Default for Remainder {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-instance decoder state
#[derive(Debug)]
pub struct RleState {
    /// Buffer for reading compressed data
    pub in_buff: [u8; IN_BUFF_SIZE],
    /// Current position in input buffer
    pub in_pos: usize,
    /// Number of bytes available in input buffer
    pub in_bytes: usize,
    /// Set once the source has returned end of file
    pub exhausted: bool,
    /// Decoded bytes not yet handed to the caller
    pub remainder: Remainder,
}

impl RleState {
    /// Create a fresh state with empty buffers
    pub fn new() -> Self {
        Self {
            in_buff: [0; IN_BUFF_SIZE],
            in_pos: 0,
            in_bytes: 0,
            exhausted: false,
            remainder: Remainder::new(),
        }
    }

    /// Ensure at least one input byte is buffered, returning false at end of source
    pub fn refill<R: Read>(&mut self, reader: &mut R) -> Result<bool> {
        if self.in_pos < self.in_bytes {
            return Ok(true);
        }
        if self.exhausted {
            return Ok(false);
        }

        loop {
            match reader.read(&mut self.in_buff) {
                Ok(0) => {
                    self.exhausted = true;
                    self.in_pos = 0;
                    self.in_bytes = 0;
                    return Ok(false);
                }
                Ok(n) => {
                    self.in_pos = 0;
                    self.in_bytes = n;
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Pull the next input byte, or `None` once the source is exhausted
    pub fn next_byte<R: Read>(&mut self, reader: &mut R) -> Result<Option<u8>> {
        if !self.refill(reader)? {
            return Ok(None);
        }
        let byte = self.in_buff[self.in_pos];
        self.in_pos += 1;
        Ok(Some(byte))
    }
}

impl Default for RleState {
    fn default() -> Self {
        Self::new()
    }
}
