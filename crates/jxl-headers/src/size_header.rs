//! Codestream SizeHeader (ISO/IEC 18181-1, section D.2)
//!
//! The first field group after the `0xFF0A` signature. Dimensions that are
//! multiples of 8 up to 256 use a 5-bit form; anything else is a `U32`
//! field. The width may instead be implied by one of seven fixed aspect
//! ratios applied to the height.

use jxl_bitstream::{BitReader, BitWriter, U32Distribution};
use jxl_core::consts::{CODESTREAM_SIGNATURE, MAX_IMAGE_DIMENSION};
use jxl_core::{FormatError, JxlError, JxlResult};
use std::fmt;
use std::io::Write;

/// Explicit dimension encodings, selected by a 2-bit distribution field
const DIMENSION: [U32Distribution; 4] = [
    U32Distribution::BitsOffset(9, 1),
    U32Distribution::BitsOffset(13, 1),
    U32Distribution::BitsOffset(18, 1),
    U32Distribution::BitsOffset(30, 1),
];

/// Fixed aspect ratios a SizeHeader can use instead of an explicit width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    Square = 1,
    SixByFive = 2,
    FourByThree = 3,
    ThreeByTwo = 4,
    SixteenByNine = 5,
    FiveByFour = 6,
    TwoByOne = 7,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 7] = [
        AspectRatio::Square,
        AspectRatio::SixByFive,
        AspectRatio::FourByThree,
        AspectRatio::ThreeByTwo,
        AspectRatio::SixteenByNine,
        AspectRatio::FiveByFour,
        AspectRatio::TwoByOne,
    ];

    /// Map the 3-bit `ratio` field; 0 means the width is explicit.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get((code as usize).wrapping_sub(1)).copied()
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// (numerator, denominator) applied to the height
    pub fn fraction(&self) -> (u64, u64) {
        match self {
            AspectRatio::Square => (1, 1),
            AspectRatio::SixByFive => (12, 10),
            AspectRatio::FourByThree => (4, 3),
            AspectRatio::ThreeByTwo => (3, 2),
            AspectRatio::SixteenByNine => (16, 9),
            AspectRatio::FiveByFour => (5, 4),
            AspectRatio::TwoByOne => (2, 1),
        }
    }

    /// Width implied by `height`, truncating toward zero
    pub fn width_for(&self, height: u32) -> u64 {
        let (num, den) = self.fraction();
        height as u64 * num / den
    }
}

/// Image dimensions decoded from the codestream's SizeHeader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeHeader {
    pub height: u32,
    pub width: u32,
}

impl SizeHeader {
    pub fn new(width: u32, height: u32) -> Self {
        Self { height, width }
    }

    pub fn pixel_count(&self) -> u64 {
        (self.width as u64) * (self.height as u64)
    }

    /// Check the `0xFF0A` signature and decode the header that follows it.
    ///
    /// Only the leading bytes are inspected; the rest of the codestream is
    /// left for a full decoder.
    pub fn from_codestream(codestream: &[u8]) -> JxlResult<Self> {
        if !codestream.starts_with(&CODESTREAM_SIGNATURE) {
            return Err(FormatError::NotRecognized.into());
        }
        let mut reader = BitReader::new(codestream);
        reader.skip_bits(16)?;
        Self::decode(&mut reader)
    }

    /// Decode from a reader positioned just after the codestream signature
    pub fn decode(reader: &mut BitReader<'_>) -> JxlResult<Self> {
        let div8 = reader.read_bit()?;
        let height = if div8 {
            read_div8(reader)?
        } else {
            reader.read_u32(&DIMENSION)?
        };

        let ratio = reader.read_bits(3)? as u8;
        let width = match AspectRatio::from_code(ratio) {
            // height is at most 2^30, so even 2:1 fits in 32 bits
            Some(aspect) => aspect.width_for(height) as u32,
            None if div8 => read_div8(reader)?,
            None => reader.read_u32(&DIMENSION)?,
        };

        let header = Self { height, width };
        tracing::debug!(%header, ratio, div8, "decoded size header");
        Ok(header)
    }

    /// Encode using the shortest form the header allows.
    ///
    /// The 5-bit form is used for the height when it is a multiple of 8 up
    /// to 256 and the width can follow it (it also fits the 5-bit form, or
    /// an aspect ratio implies it).
    pub fn encode<W: Write>(&self, writer: &mut BitWriter<W>) -> JxlResult<()> {
        check_dimension("height", self.height)?;
        let ratio = AspectRatio::ALL
            .into_iter()
            .find(|r| r.width_for(self.height) == self.width as u64);
        if ratio.is_none() {
            check_dimension("width", self.width)?;
        }
        let div8 = fits_div8(self.height) && (ratio.is_some() || fits_div8(self.width));

        writer.write_bit(div8)?;
        if div8 {
            writer.write_bits((self.height / 8 - 1) as u64, 5)?;
        } else {
            writer.write_u32(self.height, &DIMENSION)?;
        }

        match ratio {
            Some(aspect) => writer.write_bits(aspect.code() as u64, 3)?,
            None => {
                writer.write_bits(0, 3)?;
                if div8 {
                    writer.write_bits((self.width / 8 - 1) as u64, 5)?;
                } else {
                    writer.write_u32(self.width, &DIMENSION)?;
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for SizeHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

fn read_div8(reader: &mut BitReader<'_>) -> JxlResult<u32> {
    Ok(8 * (1 + reader.read_bits(5)? as u32))
}

fn check_dimension(name: &str, value: u32) -> JxlResult<()> {
    if !(1..=MAX_IMAGE_DIMENSION).contains(&value) {
        return Err(JxlError::InvalidParameter(format!(
            "{name} {value} outside 1..={MAX_IMAGE_DIMENSION}"
        )));
    }
    Ok(())
}

fn fits_div8(value: u32) -> bool {
    value % 8 == 0 && (8..=256).contains(&value)
}
