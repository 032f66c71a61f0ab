//! JPEG XL container format (ISO/IEC 18181-2)
//!
//! JPEG XL supports two bitstream formats:
//! 1. Naked codestream: 0xFF0A signature (minimal overhead)
//! 2. Container format: Box-based structure (recommended for files)
//!
//! This module walks the ISOBMFF-style boxes of a container held in memory.
//! Boxes are views into the caller's buffer; nothing is copied.

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use jxl_core::consts::*;
use jxl_core::{FormatError, JxlError, JxlResult, Location};
use std::fmt;
use std::io::Write;

/// Box types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoxType {
    /// Signature box (`JXL `)
    Signature,
    /// File type box
    FileType,
    /// Conformance level box
    Level,
    /// JXL codestream box
    JxlCodestream,
    /// Partial JXL codestream box
    JxlPartial,
    /// Frame index box
    FrameIndex,
    /// Exif metadata
    Exif,
    /// XML metadata
    Xml,
    /// JUMBF metadata
    Jumbf,
    /// Brotli-compressed box
    Brotli,
    /// Unknown/custom box
    Unknown([u8; 4]),
}

impl BoxType {
    pub fn from_fourcc(fourcc: &[u8; 4]) -> Self {
        match *fourcc {
            TYPE_SIGNATURE => BoxType::Signature,
            TYPE_FILE_TYPE => BoxType::FileType,
            TYPE_LEVEL => BoxType::Level,
            TYPE_CODESTREAM => BoxType::JxlCodestream,
            TYPE_PARTIAL_CODESTREAM => BoxType::JxlPartial,
            TYPE_FRAME_INDEX => BoxType::FrameIndex,
            [b'E', b'x', b'i', b'f'] => BoxType::Exif,
            [b'x', b'm', b'l', b' '] => BoxType::Xml,
            [b'j', b'u', b'm', b'b'] => BoxType::Jumbf,
            [b'b', b'r', b'o', b'b'] => BoxType::Brotli,
            _ => BoxType::Unknown(*fourcc),
        }
    }

    pub fn to_fourcc(&self) -> [u8; 4] {
        match self {
            BoxType::Signature => TYPE_SIGNATURE,
            BoxType::FileType => TYPE_FILE_TYPE,
            BoxType::Level => TYPE_LEVEL,
            BoxType::JxlCodestream => TYPE_CODESTREAM,
            BoxType::JxlPartial => TYPE_PARTIAL_CODESTREAM,
            BoxType::FrameIndex => TYPE_FRAME_INDEX,
            BoxType::Exif => *b"Exif",
            BoxType::Xml => *b"xml ",
            BoxType::Jumbf => *b"jumb",
            BoxType::Brotli => *b"brob",
            BoxType::Unknown(fourcc) => *fourcc,
        }
    }
}

impl fmt::Display for BoxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.to_fourcc() {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02x}")?;
            }
        }
        Ok(())
    }
}

/// A box in the JPEG XL container, borrowed from the container buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JxlBox<'a> {
    /// Byte offset of the box header in the container
    pub offset: usize,
    /// Total length including the header
    pub length: u64,
    /// 8, or 16 when the extended `XLBox` field is present
    pub header_length: u64,
    pub box_type: BoxType,
    pub payload: &'a [u8],
}

impl JxlBox<'_> {
    /// Offset of the first payload byte in the container
    pub fn payload_offset(&self) -> usize {
        self.offset + self.header_length as usize
    }
}

/// Parse the box starting at `offset`.
///
/// Returns the box and the number of bytes it occupies, which is where the
/// next box starts.
pub fn parse_box(data: &[u8], offset: usize) -> Result<(JxlBox<'_>, usize), FormatError> {
    let remaining = data.len().saturating_sub(offset) as u64;

    let lbox = BigEndian::read_u32(read_at(data, offset, 4)?);
    if (2..=8).contains(&lbox) {
        return Err(FormatError::InvalidLength {
            offset: offset as u64,
            length: lbox as u64,
        });
    }

    let header = read_at(data, offset, BOX_HEADER_LEN as usize)?;
    let box_type = BoxType::from_fourcc(&[header[4], header[5], header[6], header[7]]);

    let (header_length, length) = match lbox {
        0 => (BOX_HEADER_LEN, remaining),
        1 => {
            let xlbox = BigEndian::read_u64(read_at(data, offset + 8, 8)?);
            if xlbox <= EXTENDED_BOX_HEADER_LEN {
                return Err(FormatError::InvalidLength {
                    offset: offset as u64,
                    length: xlbox,
                });
            }
            (EXTENDED_BOX_HEADER_LEN, xlbox)
        }
        n => (BOX_HEADER_LEN, n as u64),
    };

    if length > remaining {
        return Err(FormatError::Truncated {
            at: Location::Byte(offset as u64),
            needed: length,
            available: remaining,
        });
    }

    // length <= remaining, which came from a usize
    let length_bytes = length as usize;
    let payload = &data[offset + header_length as usize..offset + length_bytes];

    tracing::debug!(offset, %box_type, length, "parsed box");

    Ok((
        JxlBox {
            offset,
            length,
            header_length,
            box_type,
            payload,
        },
        length_bytes,
    ))
}

fn read_at(data: &[u8], offset: usize, len: usize) -> Result<&[u8], FormatError> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(FormatError::Truncated {
            at: Location::Byte(offset as u64),
            needed: len as u64,
            available: data.len().saturating_sub(offset) as u64,
        })
}

/// Iterator over consecutive boxes, ending at the end of the buffer.
///
/// Yields at most one error, after which it is exhausted.
#[derive(Debug, Clone)]
pub struct Boxes<'a> {
    data: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> Boxes<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::starting_at(data, 0)
    }

    pub fn starting_at(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            offset,
            failed: false,
        }
    }

    /// Offset of the next box to be parsed
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for Boxes<'a> {
    type Item = Result<JxlBox<'a>, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.data.len() {
            return None;
        }

        match parse_box(self.data, self.offset) {
            Ok((jxl_box, consumed)) => {
                self.offset += consumed;
                Some(Ok(jxl_box))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for Boxes<'_> {}

/// Write one box. The extended `XLBox` form is used when `extended` is set
/// or when the box does not fit a 32-bit length.
///
/// Empty payloads are rejected: a header-only box would need `LBox` 8 or
/// `XLBox` 16, both of which readers refuse.
pub fn write_box<W: Write>(
    writer: &mut W,
    box_type: BoxType,
    payload: &[u8],
    extended: bool,
) -> JxlResult<()> {
    if payload.is_empty() {
        return Err(JxlError::InvalidParameter(format!(
            "{box_type} box needs a non-empty payload"
        )));
    }
    let compact_size = BOX_HEADER_LEN + payload.len() as u64;

    if extended || compact_size > u32::MAX as u64 {
        writer.write_u32::<BigEndian>(1)?;
        writer.write_all(&box_type.to_fourcc())?;
        writer.write_u64::<BigEndian>(EXTENDED_BOX_HEADER_LEN + payload.len() as u64)?;
    } else {
        writer.write_u32::<BigEndian>(compact_size as u32)?;
        writer.write_all(&box_type.to_fourcc())?;
    }

    writer.write_all(payload)?;
    Ok(())
}

/// Write the signature and File Type boxes every container starts with
pub fn write_container_header<W: Write>(writer: &mut W) -> JxlResult<()> {
    writer.write_all(&CONTAINER_SIGNATURE)?;
    writer.write_all(&FILE_TYPE_BOX)?;
    Ok(())
}
