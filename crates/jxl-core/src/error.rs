//! Error types for JPEG XL operations

use std::fmt;
use thiserror::Error;

/// Result type for JPEG XL operations
pub type JxlResult<T> = Result<T, JxlError>;

/// Errors that can occur while reading a JPEG XL bitstream
#[derive(Error, Debug)]
pub enum JxlError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl JxlError {
    /// The structural failure behind this error, if it is one.
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            JxlError::Format(e) => Some(e),
            _ => None,
        }
    }
}

/// A position inside the input, either a byte offset into the container or
/// a bit offset into the codestream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Location {
    Byte(u64),
    Bit(u64),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Byte(offset) => write!(f, "byte {offset}"),
            Location::Bit(offset) => write!(f, "bit {offset}"),
        }
    }
}

impl Location {
    fn unit(&self) -> &'static str {
        match self {
            Location::Byte(_) => "bytes",
            Location::Bit(_) => "bits",
        }
    }
}

/// Structural failures found while sniffing, walking boxes or decoding the
/// size header.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Not a JPEG XL file")]
    NotRecognized,

    #[error("Invalid signature box")]
    InvalidSignatureBox,

    #[error("Invalid file type box")]
    InvalidFileTypeBox,

    /// Reserved `LBox` value (2..=8) or an `XLBox` that cannot hold its own header.
    #[error("Invalid box length {length} at byte {offset}")]
    InvalidLength { offset: u64, length: u64 },

    #[error("Truncated input at {at}: needed {needed} {unit}, {available} available", unit = .at.unit())]
    Truncated {
        at: Location,
        needed: u64,
        available: u64,
    },

    #[error("No codestream box found in container")]
    MissingCodestream,

    #[error("Unknown level {level} in level box at byte {offset}")]
    UnknownLevel { offset: u64, level: u64 },
}
