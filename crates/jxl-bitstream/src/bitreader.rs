//! Bitstream reader implementation

use crate::U32Distribution;
use jxl_core::{FormatError, JxlError, JxlResult, Location};

/// Saved reader position, used to look ahead and rewind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitCursor {
    bit_offset: u64,
}

impl BitCursor {
    pub fn bit_offset(&self) -> u64 {
        self.bit_offset
    }
}

/// A bitstream reader over a byte slice.
///
/// The slice is treated as one little-endian integer: bits are consumed
/// least-significant first, starting with bit 0 of byte 0. Reads past the
/// end fail instead of yielding zero bits.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_offset: u64,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            bit_offset: 0,
        }
    }

    /// Total number of bits in the underlying buffer
    pub fn total_bits(&self) -> u64 {
        self.data.len() as u64 * 8
    }

    pub fn bits_remaining(&self) -> u64 {
        self.total_bits().saturating_sub(self.bit_offset)
    }

    /// Current position in bits from the start of the buffer
    pub fn position(&self) -> u64 {
        self.bit_offset
    }

    pub fn snapshot(&self) -> BitCursor {
        BitCursor {
            bit_offset: self.bit_offset,
        }
    }

    /// Rewind (or advance) to a saved position.
    ///
    /// Fails if the cursor lies past the end of this reader's buffer, which
    /// happens when it was taken from a different reader.
    pub fn restore(&mut self, cursor: BitCursor) -> JxlResult<()> {
        if cursor.bit_offset > self.total_bits() {
            return Err(JxlError::InvalidParameter(format!(
                "Cursor at bit {} is outside a {}-bit buffer",
                cursor.bit_offset,
                self.total_bits()
            )));
        }
        self.bit_offset = cursor.bit_offset;
        Ok(())
    }

    /// Read up to 63 bits from the stream
    pub fn read_bits(&mut self, num_bits: usize) -> JxlResult<u64> {
        if num_bits >= 64 {
            return Err(JxlError::InvalidParameter(format!(
                "Cannot read {num_bits} bits at once (maximum is 63)"
            )));
        }
        self.ensure(num_bits as u64)?;

        let mut value = 0u64;
        let mut filled = 0usize;
        while filled < num_bits {
            let byte = self.data[(self.bit_offset / 8) as usize];
            let shift = (self.bit_offset % 8) as usize;
            let take = (8 - shift).min(num_bits - filled);
            let chunk = (byte >> shift) as u64 & ((1u64 << take) - 1);
            value |= chunk << filled;
            filled += take;
            self.bit_offset += take as u64;
        }

        Ok(value)
    }

    /// Read a single bit
    pub fn read_bit(&mut self) -> JxlResult<bool> {
        self.read_bits(1).map(|b| b != 0)
    }

    /// Read a `U32` field: a 2-bit selector picks one of four distributions.
    pub fn read_u32(&mut self, distributions: &[U32Distribution; 4]) -> JxlResult<u32> {
        let selector = self.read_bits(2)? as usize;
        match distributions[selector] {
            U32Distribution::Val(value) => Ok(value),
            U32Distribution::Bits(bits) => Ok(self.read_bits(bits as usize)? as u32),
            U32Distribution::BitsOffset(bits, offset) => {
                let raw = self.read_bits(bits as usize)? as u32;
                raw.checked_add(offset).ok_or_else(|| {
                    JxlError::InvalidParameter(format!(
                        "U32 value {raw} + {offset} does not fit in 32 bits"
                    ))
                })
            }
        }
    }

    pub fn skip_bits(&mut self, num_bits: u64) -> JxlResult<()> {
        self.ensure(num_bits)?;
        self.bit_offset += num_bits;
        Ok(())
    }

    /// Skip to byte boundary
    pub fn align_to_byte(&mut self) -> JxlResult<()> {
        let bits_to_skip = (8 - self.bit_offset % 8) % 8;
        self.skip_bits(bits_to_skip)
    }

    fn ensure(&self, num_bits: u64) -> JxlResult<()> {
        let available = self.bits_remaining();
        if num_bits > available {
            return Err(FormatError::Truncated {
                at: Location::Bit(self.bit_offset),
                needed: num_bits,
                available,
            }
            .into());
        }
        Ok(())
    }
}
