//! Shared helpers for integration tests
//!
//! Independent encoders used to build inputs for the decoders under test.

#![allow(dead_code)]

/// Builds a PP20 payload bit by bit in the order the decoder reads it
#[derive(Debug, Default)]
pub struct BitEmitter {
    bits: Vec<u8>,
}

impl BitEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` as a `width`-bit group, most significant bit first
    pub fn put(&mut self, value: u32, width: u32) -> &mut Self {
        for i in (0..width).rev() {
            self.bits.push(((value >> i) & 1) as u8);
        }
        self
    }

    /// Append a literal count run: 2-bit groups summing to `count - 1`
    pub fn literal_count(&mut self, count: usize) -> &mut Self {
        let mut rest = count - 1;
        while rest >= 3 {
            self.put(3, 2);
            rest -= 3;
        }
        self.put(rest as u32, 2)
    }

    /// Serialize into a complete blob
    ///
    /// The first read bit is bit 0 of the last payload byte, so the skip
    /// bits occupy the low bits of that byte.
    pub fn finish(&self, widths: [u8; 4], decompressed_len: usize, skip: u8) -> Vec<u8> {
        let total = skip as usize + self.bits.len();
        let payload_len = total.div_ceil(8);
        let mut payload = vec![0u8; payload_len];

        for (i, &bit) in self.bits.iter().enumerate() {
            let n = skip as usize + i;
            payload[payload_len - 1 - n / 8] |= bit << (n % 8);
        }

        let mut blob = b"PP20".to_vec();
        blob.extend_from_slice(&widths);
        blob.extend_from_slice(&payload);
        blob.extend_from_slice(&(((decompressed_len as u32) << 8) | skip as u32).to_be_bytes());
        blob
    }
}

/// Default offset widths used by the tests
pub const WIDTHS: [u8; 4] = [9, 10, 11, 12];

/// Crunch `data` as a single literal run
pub fn literal_blob(data: &[u8]) -> Vec<u8> {
    let mut bits = BitEmitter::new();
    if !data.is_empty() {
        bits.put(0, 1).literal_count(data.len());
        // output is produced from the end backward
        for &byte in data.iter().rev() {
            bits.put(byte as u32, 8);
        }
    }
    bits.finish(WIDTHS, data.len(), 0)
}

/// Greedy byte-run encoder
pub fn rle_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < data.len() {
        let mut run = 1;
        while i + run < data.len() && run < 128 && data[i + run] == data[i] {
            run += 1;
        }

        if run >= 2 {
            out.push((257 - run) as u8);
            out.push(data[i]);
            i += run;
            continue;
        }

        let start = i;
        while i < data.len() && i - start < 128 {
            if i + 1 < data.len() && data[i + 1] == data[i] {
                break;
            }
            i += 1;
        }
        out.push((i - start - 1) as u8);
        out.extend_from_slice(&data[start..i]);
    }

    out
}
