//! Core types for JPEG XL

use std::fmt;

/// How a bitstream is packaged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BitstreamKind {
    /// Naked codestream starting with `0xFF 0x0A`
    RawCodestream,
    /// ISOBMFF-style box container
    BoxedContainer,
}

impl fmt::Display for BitstreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitstreamKind::RawCodestream => f.write_str("raw codestream"),
            BitstreamKind::BoxedContainer => f.write_str("container"),
        }
    }
}
