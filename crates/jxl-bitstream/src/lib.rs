//! Bitstream reading and writing for JPEG XL
//!
//! Bits are packed least-significant first, as in every JPEG XL header field.

pub mod bitreader;
pub mod bitwriter;

pub use bitreader::{BitCursor, BitReader};
pub use bitwriter::BitWriter;

/// One of the four encodings a `U32` header field may select with its
/// 2-bit selector (ISO/IEC 18181-1, section 9.2.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum U32Distribution {
    /// A constant; no further bits are read.
    Val(u32),
    /// `n` raw bits.
    Bits(u8),
    /// `n` raw bits plus a constant offset.
    BitsOffset(u8, u32),
}

impl U32Distribution {
    /// The raw bits to write for `value`, `Some(None)` for a matching
    /// constant, or `None` if this distribution cannot express it.
    fn raw_for(&self, value: u32) -> Option<Option<(u32, u8)>> {
        match *self {
            U32Distribution::Val(v) => (v == value).then_some(None),
            U32Distribution::Bits(bits) => fits(value, bits).then_some(Some((value, bits))),
            U32Distribution::BitsOffset(bits, offset) => {
                let raw = value.checked_sub(offset)?;
                fits(raw, bits).then_some(Some((raw, bits)))
            }
        }
    }
}

fn fits(value: u32, bits: u8) -> bool {
    bits >= 32 || value >> bits == 0
}
