//! Core types and utilities for JPEG XL bitstream inspection
//!
//! This crate provides the fundamental types shared by the container walker,
//! the bit reader and the header decoder: format constants, the bitstream
//! kind and the error taxonomy.

pub mod consts;
pub mod error;
pub mod types;

pub use error::{FormatError, JxlError, JxlResult, Location};
pub use types::*;
