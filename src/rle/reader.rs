//! RunLengthDecoder - Resumable byte-run decompression reader
//!
//! This module implements the RunLengthDecoder that provides a Read interface
//! over a byte-run stream. A record that expands past the caller's buffer
//! leaves its tail in the remainder, which is flushed first on the next call.

use super::{state::RleState, LITERAL_MAX, NOOP_CONTROL};
use crate::{AssetError, Result};
use log::{debug, trace};
use std::io::Read;

/// Resumable byte-run decoder implementing the Read trait
#[derive(Debug)]
pub struct RunLengthDecoder<R: Read> {
    reader: R,
    state: RleState,
}

impl<R: Read> RunLengthDecoder<R> {
    /// Create a new decoder over `reader`
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            state: RleState::new(),
        }
    }

    /// Number of decoded bytes waiting to be returned
    pub fn remainder_len(&self) -> usize {
        self.state.remainder.len()
    }

    /// True when the source is exhausted and no decoded bytes are buffered
    ///
    /// May pull from the source to find out whether it has more data.
    pub fn is_at_end(&mut self) -> Result<bool> {
        if !self.state.remainder.is_empty() {
            return Ok(false);
        }
        Ok(!self.state.refill(&mut self.reader)?)
    }

    /// Give back the underlying reader
    ///
    /// Bytes already pulled into the input buffer are lost.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Decode up to `buf.len()` bytes, returning how many were produced
    ///
    /// A short count means the source ran out.
    pub fn decode(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut produced = self.state.remainder.drain_into(buf);

        while produced < buf.len() {
            let Some(control) = self.state.next_byte(&mut self.reader)? else {
                break;
            };

            match control {
                0..=LITERAL_MAX => {
                    let count = control as usize + 1;
                    for _ in 0..count {
                        let Some(byte) = self.state.next_byte(&mut self.reader)? else {
                            trace!("literal run of {count} cut short by end of source");
                            break;
                        };
                        produced = self.store(buf, produced, byte)?;
                    }
                }
                NOOP_CONTROL => {}
                _ => {
                    let count = (256 - control as usize) + 1;
                    let Some(byte) = self.state.next_byte(&mut self.reader)? else {
                        trace!("replicate run of {count} has no payload byte");
                        break;
                    };
                    for _ in 0..count {
                        produced = self.store(buf, produced, byte)?;
                    }
                }
            }
        }

        Ok(produced)
    }

    /// Decode exactly `dst.len()` bytes
    pub fn fill(&mut self, dst: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < dst.len() {
            let n = self.decode(&mut dst[filled..])?;
            if n == 0 {
                debug!("byte-run stream ended after {filled} of {} bytes", dst.len());
                return Err(AssetError::TruncatedInput {
                    expected: dst.len(),
                    actual: filled,
                });
            }
            filled += n;
        }
        Ok(())
    }

    fn store(&mut self, buf: &mut [u8], produced: usize, byte: u8) -> Result<usize> {
        if produced < buf.len() {
            buf[produced] = byte;
            Ok(produced + 1)
        } else {
            self.state.remainder.push(byte)?;
            Ok(produced)
        }
    }
}

impl<R: Read> Read for RunLengthDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.decode(buf) {
            Ok(n) => Ok(n),
            Err(AssetError::Io(e)) => Err(e),
            Err(e) => Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_literal_run() {
        let mut decoder = RunLengthDecoder::new(Cursor::new(vec![0x02, 0x41, 0x42, 0x43]));
        let mut out = [0u8; 3];
        assert_eq!(decoder.decode(&mut out).unwrap(), 3);
        assert_eq!(&out, b"ABC");
        assert!(decoder.is_at_end().unwrap());
    }

    #[test]
    fn test_replicate_run() {
        let mut decoder = RunLengthDecoder::new(Cursor::new(vec![0xFE, b'Z']));
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"ZZZ");
    }

    #[test]
    fn test_noop_control_consumes_nothing() {
        // 0x80 sits between two records and must not eat the following byte
        let data = vec![0x00, b'a', 0x80, 0xFF, b'b'];
        let mut decoder = RunLengthDecoder::new(Cursor::new(data));
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"abb");
    }

    #[test]
    fn test_noop_only_stream_is_empty() {
        let mut decoder = RunLengthDecoder::new(Cursor::new(vec![0x80; 16]));
        let mut out = [0u8; 4];
        assert_eq!(decoder.decode(&mut out).unwrap(), 0);
        assert!(decoder.is_at_end().unwrap());
    }

    #[test]
    fn test_remainder_carried_between_reads() {
        // one replicate record of 128 bytes, read one byte at a time
        let mut decoder = RunLengthDecoder::new(Cursor::new(vec![0x81, 0x5A]));
        let mut byte = [0u8; 1];
        assert_eq!(decoder.decode(&mut byte).unwrap(), 1);
        assert_eq!(decoder.remainder_len(), 127);
        assert!(!decoder.is_at_end().unwrap());

        let mut total = 1;
        while decoder.decode(&mut byte).unwrap() == 1 {
            assert_eq!(byte[0], 0x5A);
            total += 1;
        }
        assert_eq!(total, 128);
        assert!(decoder.is_at_end().unwrap());
    }

    #[test]
    fn test_truncated_literal_is_short_read() {
        let mut decoder = RunLengthDecoder::new(Cursor::new(vec![0x04, 1, 2]));
        let mut out = [0u8; 5];
        assert_eq!(decoder.decode(&mut out).unwrap(), 2);
        assert_eq!(&out[..2], &[1, 2]);
    }

    #[test]
    fn test_fill_reports_truncation() {
        let mut decoder = RunLengthDecoder::new(Cursor::new(vec![0xFD, 7]));
        let mut out = [0u8; 6];
        match decoder.fill(&mut out) {
            Err(AssetError::TruncatedInput { expected, actual }) => {
                assert_eq!(expected, 6);
                assert_eq!(actual, 4);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_empty_buffer_read() {
        let mut decoder = RunLengthDecoder::new(Cursor::new(vec![0x00, 1]));
        assert_eq!(decoder.decode(&mut []).unwrap(), 0);
        assert_eq!(decoder.remainder_len(), 0);
    }
}
