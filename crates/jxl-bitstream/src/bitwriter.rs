//! Bitstream writer implementation

use crate::U32Distribution;
use jxl_core::{JxlError, JxlResult};
use std::io::Write;

/// A bitstream writer for writing individual bits to a byte stream,
/// least-significant bit first (the inverse of [`crate::BitReader`])
pub struct BitWriter<W: Write> {
    writer: W,
    buffer: u64,
    bits_in_buffer: usize,
}

impl<W: Write> BitWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: 0,
            bits_in_buffer: 0,
        }
    }

    /// Write up to 56 bits to the stream
    pub fn write_bits(&mut self, value: u64, num_bits: usize) -> JxlResult<()> {
        if num_bits > 56 {
            return Err(JxlError::InvalidParameter(
                "Cannot write more than 56 bits at once".to_string(),
            ));
        }

        let mask = (1u64 << num_bits) - 1;
        self.buffer |= (value & mask) << self.bits_in_buffer;
        self.bits_in_buffer += num_bits;

        // Flush complete bytes
        while self.bits_in_buffer >= 8 {
            self.writer.write_all(&[(self.buffer & 0xFF) as u8])?;
            self.buffer >>= 8;
            self.bits_in_buffer -= 8;
        }

        Ok(())
    }

    /// Write a single bit
    pub fn write_bit(&mut self, value: bool) -> JxlResult<()> {
        self.write_bits(value as u64, 1)
    }

    /// Write a `U32` field using the first distribution able to hold `value`
    pub fn write_u32(&mut self, value: u32, distributions: &[U32Distribution; 4]) -> JxlResult<()> {
        let (selector, raw) = distributions
            .iter()
            .enumerate()
            .find_map(|(i, dist)| dist.raw_for(value).map(|raw| (i, raw)))
            .ok_or_else(|| {
                JxlError::InvalidParameter(format!(
                    "{value} is not representable by any U32 distribution"
                ))
            })?;

        self.write_bits(selector as u64, 2)?;
        if let Some((raw, bits)) = raw {
            self.write_bits(raw as u64, bits as usize)?;
        }
        Ok(())
    }

    /// Align to byte boundary by writing zero bits
    pub fn align_to_byte(&mut self) -> JxlResult<()> {
        let bits_to_write = (8 - (self.bits_in_buffer % 8)) % 8;
        if bits_to_write > 0 {
            self.write_bits(0, bits_to_write)?;
        }
        Ok(())
    }

    /// Flush remaining bits and the underlying writer
    pub fn flush(&mut self) -> JxlResult<()> {
        if self.bits_in_buffer > 0 {
            self.writer.write_all(&[(self.buffer & 0xFF) as u8])?;
            self.buffer = 0;
            self.bits_in_buffer = 0;
        }
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
