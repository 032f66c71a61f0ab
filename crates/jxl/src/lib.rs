//! # JPEG XL - container stripping and header inspection
//!
//! This crate reads JPEG XL files in either packaging, removes the ISOBMFF
//! container when there is one, and decodes the image dimensions from the
//! codestream's size header.
//!
//! ## Quick Start
//!
//! ### Inspecting
//!
//! ```no_run
//! let data = std::fs::read("input.jxl").unwrap();
//! let info = jxl::inspect(&data).unwrap();
//! println!("{} image, {}", info.kind, info.size);
//! ```
//!
//! ### Stripping
//!
//! ```no_run
//! use jxl::fs::{strip_file, StripOptions};
//!
//! let outcome = strip_file("input.jxl", &StripOptions::default()).unwrap();
//! println!("{outcome:?}");
//! ```
//!
//! ## Scope
//!
//! Pixel data is not decoded. [`Codestream::header_reader`] hands back a
//! reader positioned after the size header for decoders that continue with
//! the image metadata.

pub mod codestream;
pub mod fs;

pub use codestream::{inspect, read_size_header, strip, Codestream, JxlInfo, Stripped};

// Re-export core types
pub use jxl_bitstream::{BitCursor, BitReader};
pub use jxl_core::{BitstreamKind, FormatError, JxlError, JxlResult, Location};
pub use jxl_headers::{
    AspectRatio, BoxSummary, BoxType, ContainerSummary, ContainerWarning, SizeHeader,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// JPEG XL specification version this implementation targets
pub const SPEC_VERSION: &str = "ISO/IEC 18181:2022";
