//! Container stripping and header inspection over in-memory bitstreams

use jxl_bitstream::BitReader;
use jxl_core::consts::CODESTREAM_SIGNATURE;
use jxl_core::{BitstreamKind, FormatError, JxlResult};
use jxl_headers::{reassemble, sniff, ContainerSummary, SizeHeader};
use std::borrow::Cow;
use std::ops::Deref;

/// A complete JPEG XL codestream with no container around it.
///
/// Borrowed from the input when the input already was a naked codestream or
/// held it in a single `jxlc` box; owned when it was joined from fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codestream<'a> {
    bytes: Cow<'a, [u8]>,
}

impl<'a> Codestream<'a> {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_owned(self) -> Vec<u8> {
        self.bytes.into_owned()
    }

    /// Whether the bytes alias the input buffer
    pub fn is_borrowed(&self) -> bool {
        matches!(self.bytes, Cow::Borrowed(_))
    }

    pub fn has_signature(&self) -> bool {
        self.bytes.starts_with(&CODESTREAM_SIGNATURE)
    }

    /// Decode the image dimensions
    pub fn size_header(&self) -> JxlResult<SizeHeader> {
        SizeHeader::from_codestream(&self.bytes)
    }

    /// Decode the image dimensions and return a reader positioned on the
    /// first bit after them, where the rest of the image metadata begins.
    pub fn header_reader(&self) -> JxlResult<(SizeHeader, BitReader<'_>)> {
        if !self.has_signature() {
            return Err(FormatError::NotRecognized.into());
        }
        let mut reader = BitReader::new(&self.bytes);
        reader.skip_bits(16)?;
        let size = SizeHeader::decode(&mut reader)?;
        Ok((size, reader))
    }
}

impl Deref for Codestream<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for Codestream<'_> {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Result of [`strip`]
#[derive(Debug, Clone)]
pub struct Stripped<'a> {
    pub kind: BitstreamKind,
    pub codestream: Codestream<'a>,
    /// Present when the input was a container
    pub container: Option<ContainerSummary>,
}

/// Remove the container around a codestream, if there is one.
///
/// A naked codestream is returned as-is without copying.
pub fn strip(data: &[u8]) -> JxlResult<Stripped<'_>> {
    match sniff(data)? {
        BitstreamKind::RawCodestream => Ok(Stripped {
            kind: BitstreamKind::RawCodestream,
            codestream: Codestream {
                bytes: Cow::Borrowed(data),
            },
            container: None,
        }),
        BitstreamKind::BoxedContainer => {
            let reassembled = reassemble(data)?;
            let codestream = Codestream {
                bytes: reassembled.codestream,
            };
            if !codestream.has_signature() {
                tracing::warn!(
                    len = codestream.len(),
                    "extracted codestream does not start with the codestream signature"
                );
            }
            Ok(Stripped {
                kind: BitstreamKind::BoxedContainer,
                codestream,
                container: Some(reassembled.summary),
            })
        }
    }
}

/// Decode the image dimensions of a naked codestream or container
pub fn read_size_header(data: &[u8]) -> JxlResult<SizeHeader> {
    strip(data)?.codestream.size_header()
}

/// Summary of a JPEG XL file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JxlInfo {
    pub kind: BitstreamKind,
    pub file_len: usize,
    pub codestream_len: usize,
    pub size: SizeHeader,
    pub container: Option<ContainerSummary>,
}

/// Strip the container and decode the size header in one go
pub fn inspect(data: &[u8]) -> JxlResult<JxlInfo> {
    let stripped = strip(data)?;
    let size = stripped.codestream.size_header()?;

    Ok(JxlInfo {
        kind: stripped.kind,
        file_len: data.len(),
        codestream_len: stripped.codestream.len(),
        size,
        container: stripped.container,
    })
}
