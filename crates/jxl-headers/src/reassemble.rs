//! Codestream extraction from a container
//!
//! The codestream is either stored whole in one `jxlc` box or split across
//! `jxlp` boxes, each prefixed with a big-endian fragment index. Fragments
//! may appear in any physical order; they are joined in index order.

use crate::container::{BoxType, Boxes, JxlBox};
use byteorder::{BigEndian, ByteOrder};
use jxl_core::consts::{
    CONTAINER_SIGNATURE, FILE_TYPE_BOX, FIRST_BOX_OFFSET, LEVEL_10, LEVEL_5,
};
use jxl_core::{FormatError, Location};
use std::borrow::Cow;

/// One slice of a codestream carried by a `jxlp` box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialCodestreamChunk<'a> {
    pub index: u32,
    pub data: &'a [u8],
}

impl<'a> PartialCodestreamChunk<'a> {
    /// Split a `jxlp` payload into its index and fragment data
    pub fn parse(jxl_box: &JxlBox<'a>) -> Result<Self, FormatError> {
        let payload = jxl_box.payload;
        if payload.len() < 4 {
            return Err(FormatError::Truncated {
                at: Location::Byte(jxl_box.payload_offset() as u64),
                needed: 4,
                available: payload.len() as u64,
            });
        }

        Ok(Self {
            index: BigEndian::read_u32(&payload[..4]),
            data: &payload[4..],
        })
    }
}

/// Anomalies that do not stop extraction but suggest a malformed file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContainerWarning {
    /// Both `jxlc` and `jxlp` boxes are present; the fragments were used.
    MixedCodestreamBoxes,
    /// A second `jxlc` box replaced an earlier one.
    DuplicateCodestreamBox { offset: u64 },
    /// Two fragments share an index; they were kept in stream order.
    DuplicateFragmentIndex { index: u32 },
}

/// A box seen while walking the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxSummary {
    pub offset: u64,
    pub box_type: BoxType,
    pub length: u64,
}

/// What the container held besides the codestream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerSummary {
    /// Conformance level from the `jxll` box, if any
    pub level: Option<u8>,
    /// Every box after the File Type box, in stream order
    pub boxes: Vec<BoxSummary>,
    pub warnings: Vec<ContainerWarning>,
}

/// A codestream extracted from a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassembled<'a> {
    /// Borrowed from the container when a single `jxlc` box held it,
    /// owned when it was joined from fragments
    pub codestream: Cow<'a, [u8]>,
    pub summary: ContainerSummary,
}

/// Validate the leading boxes of a container and extract its codestream.
///
/// Any malformed box aborts extraction. Box types other than those of the
/// JPEG XL container are skipped.
pub fn reassemble(data: &[u8]) -> Result<Reassembled<'_>, FormatError> {
    if data.get(..CONTAINER_SIGNATURE.len()) != Some(&CONTAINER_SIGNATURE[..]) {
        return Err(FormatError::InvalidSignatureBox);
    }
    if data.get(CONTAINER_SIGNATURE.len()..FIRST_BOX_OFFSET) != Some(&FILE_TYPE_BOX[..]) {
        return Err(FormatError::InvalidFileTypeBox);
    }

    let mut summary = ContainerSummary::default();
    let mut full: Option<&[u8]> = None;
    let mut fragments = Vec::new();

    for jxl_box in Boxes::starting_at(data, FIRST_BOX_OFFSET) {
        let jxl_box = jxl_box?;
        summary.boxes.push(BoxSummary {
            offset: jxl_box.offset as u64,
            box_type: jxl_box.box_type,
            length: jxl_box.length,
        });

        match jxl_box.box_type {
            BoxType::Level => summary.level = Some(parse_level(&jxl_box)?),
            BoxType::JxlCodestream => {
                if full.is_some() {
                    summary.warnings.push(ContainerWarning::DuplicateCodestreamBox {
                        offset: jxl_box.offset as u64,
                    });
                }
                full = Some(jxl_box.payload);
            }
            BoxType::JxlPartial => fragments.push(PartialCodestreamChunk::parse(&jxl_box)?),
            // Frame index and metadata boxes carry nothing the codestream needs.
            _ => {}
        }
    }

    let codestream = if fragments.is_empty() {
        Cow::Borrowed(full.ok_or(FormatError::MissingCodestream)?)
    } else {
        if full.is_some() {
            summary.warnings.push(ContainerWarning::MixedCodestreamBoxes);
        }
        Cow::Owned(join_fragments(&mut fragments, &mut summary.warnings))
    };

    for warning in &summary.warnings {
        tracing::warn!(?warning, "malformed container");
    }
    tracing::debug!(
        boxes = summary.boxes.len(),
        fragments = fragments.len(),
        codestream_len = codestream.len(),
        "extracted codestream"
    );

    Ok(Reassembled {
        codestream,
        summary,
    })
}

/// Stable-sort fragments by index and concatenate them.
fn join_fragments(
    fragments: &mut [PartialCodestreamChunk<'_>],
    warnings: &mut Vec<ContainerWarning>,
) -> Vec<u8> {
    fragments.sort_by_key(|chunk| chunk.index);

    for pair in fragments.windows(2) {
        let index = pair[1].index;
        if pair[0].index == index
            && !warnings.contains(&ContainerWarning::DuplicateFragmentIndex { index })
        {
            warnings.push(ContainerWarning::DuplicateFragmentIndex { index });
        }
    }

    let total = fragments.iter().map(|chunk| chunk.data.len()).sum();
    let mut codestream = Vec::with_capacity(total);
    for chunk in fragments.iter() {
        codestream.extend_from_slice(chunk.data);
    }
    codestream
}

/// The level box holds one big-endian integer; only levels 5 and 10 exist.
fn parse_level(jxl_box: &JxlBox<'_>) -> Result<u8, FormatError> {
    let level = jxl_box
        .payload
        .iter()
        .fold(0u64, |acc, &b| acc.saturating_mul(256).saturating_add(b as u64));

    match level {
        5 => Ok(LEVEL_5),
        10 => Ok(LEVEL_10),
        _ => Err(FormatError::UnknownLevel {
            offset: jxl_box.offset as u64,
            level,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{write_box, write_container_header};

    fn container(boxes: &[(BoxType, Vec<u8>)]) -> Vec<u8> {
        let mut data = Vec::new();
        write_container_header(&mut data).unwrap();
        for (box_type, payload) in boxes {
            write_box(&mut data, *box_type, payload, false).unwrap();
        }
        data
    }

    fn fragment(index: u32, data: &[u8]) -> (BoxType, Vec<u8>) {
        let mut payload = index.to_be_bytes().to_vec();
        payload.extend_from_slice(data);
        (BoxType::JxlPartial, payload)
    }

    #[test]
    fn test_single_codestream_box_is_borrowed() {
        let codestream = vec![0xFF, 0x0A, 0x00, 0x01, 0x02, 0x03];
        let data = container(&[(BoxType::JxlCodestream, codestream.clone())]);

        let result = reassemble(&data).unwrap();
        assert_eq!(result.codestream, codestream);
        assert!(matches!(result.codestream, Cow::Borrowed(_)));
        assert!(result.summary.warnings.is_empty());
        assert_eq!(result.summary.level, None);
    }

    #[test]
    fn test_fragments_joined_in_index_order() {
        let data = container(&[fragment(1, b"BB"), fragment(0, b"AAA"), fragment(2, b"C")]);

        let result = reassemble(&data).unwrap();
        assert_eq!(&result.codestream[..], b"AAABBC");
        assert!(result.summary.warnings.is_empty());
    }

    #[test]
    fn test_duplicate_fragment_indices_keep_stream_order() {
        let data = container(&[fragment(3, b"x"), fragment(1, b"a"), fragment(3, b"y")]);

        let result = reassemble(&data).unwrap();
        assert_eq!(&result.codestream[..], b"axy");
        assert_eq!(
            result.summary.warnings,
            vec![ContainerWarning::DuplicateFragmentIndex { index: 3 }]
        );
    }

    #[test]
    fn test_fragments_win_over_full_box() {
        let data = container(&[
            (BoxType::JxlCodestream, b"full".to_vec()),
            fragment(0, b"part"),
        ]);

        let result = reassemble(&data).unwrap();
        assert_eq!(&result.codestream[..], b"part");
        assert_eq!(
            result.summary.warnings,
            vec![ContainerWarning::MixedCodestreamBoxes]
        );
    }

    #[test]
    fn test_last_full_box_wins() {
        let data = container(&[
            (BoxType::JxlCodestream, b"first".to_vec()),
            (BoxType::JxlCodestream, b"second".to_vec()),
        ]);

        let result = reassemble(&data).unwrap();
        assert_eq!(&result.codestream[..], b"second");
        assert_eq!(
            result.summary.warnings,
            vec![ContainerWarning::DuplicateCodestreamBox { offset: 45 }]
        );
    }

    #[test]
    fn test_missing_codestream() {
        let data = container(&[
            (BoxType::Exif, vec![0; 6]),
            (BoxType::FrameIndex, vec![1, 2, 3]),
        ]);
        assert_eq!(reassemble(&data).unwrap_err(), FormatError::MissingCodestream);

        let mut bare = Vec::new();
        write_container_header(&mut bare).unwrap();
        assert_eq!(reassemble(&bare).unwrap_err(), FormatError::MissingCodestream);
    }

    #[test]
    fn test_invalid_leading_boxes() {
        let good = container(&[(BoxType::JxlCodestream, vec![0xFF, 0x0A])]);

        let mut bad_signature = good.clone();
        bad_signature[9] = 0x00;
        assert_eq!(
            reassemble(&bad_signature).unwrap_err(),
            FormatError::InvalidSignatureBox
        );

        let mut bad_ftyp = good.clone();
        bad_ftyp[31] = b'X';
        assert_eq!(
            reassemble(&bad_ftyp).unwrap_err(),
            FormatError::InvalidFileTypeBox
        );

        assert_eq!(
            reassemble(&good[..20]).unwrap_err(),
            FormatError::InvalidFileTypeBox
        );
        assert_eq!(reassemble(&[]).unwrap_err(), FormatError::InvalidSignatureBox);
    }

    #[test]
    fn test_levels() {
        for (payload, expected) in [(vec![5], 5), (vec![10], 10), (vec![0, 0, 0, 10], 10)] {
            let data = container(&[
                (BoxType::Level, payload),
                (BoxType::JxlCodestream, vec![0xFF, 0x0A]),
            ]);
            assert_eq!(reassemble(&data).unwrap().summary.level, Some(expected));
        }

        for (payload, level) in [(vec![6], 6), (vec![0], 0), (vec![0xFF; 9], u64::MAX)] {
            let data = container(&[
                (BoxType::Level, payload),
                (BoxType::JxlCodestream, vec![0xFF, 0x0A]),
            ]);
            assert_eq!(
                reassemble(&data).unwrap_err(),
                FormatError::UnknownLevel { offset: 32, level }
            );
        }
    }

    #[test]
    fn test_empty_trailing_level_box() {
        let mut data = container(&[(BoxType::JxlCodestream, vec![0xFF, 0x0A])]);
        data.extend_from_slice(&[0, 0, 0, 0, b'j', b'x', b'l', b'l']);
        assert_eq!(
            reassemble(&data).unwrap_err(),
            FormatError::UnknownLevel {
                offset: 42,
                level: 0
            }
        );
    }

    #[test]
    fn test_short_fragment_is_truncated() {
        let data = container(&[(BoxType::JxlPartial, vec![0, 0, 1])]);
        assert_eq!(
            reassemble(&data).unwrap_err(),
            FormatError::Truncated {
                at: Location::Byte(40),
                needed: 4,
                available: 3,
            }
        );
    }

    #[test]
    fn test_malformed_box_aborts() {
        let mut data = container(&[fragment(0, b"ok")]);
        data.extend_from_slice(&[0, 0, 0, 3, b'j', b'x', b'l', b'p']);
        assert_eq!(
            reassemble(&data).unwrap_err(),
            FormatError::InvalidLength {
                offset: 46,
                length: 3
            }
        );
    }

    #[test]
    fn test_summary_lists_boxes() {
        let data = container(&[
            (BoxType::Level, vec![5]),
            (BoxType::Unknown(*b"abcd"), vec![0]),
            (BoxType::JxlCodestream, vec![0xFF, 0x0A]),
        ]);

        let summary = reassemble(&data).unwrap().summary;
        assert_eq!(
            summary.boxes,
            vec![
                BoxSummary {
                    offset: 32,
                    box_type: BoxType::Level,
                    length: 9
                },
                BoxSummary {
                    offset: 41,
                    box_type: BoxType::Unknown(*b"abcd"),
                    length: 9
                },
                BoxSummary {
                    offset: 50,
                    box_type: BoxType::JxlCodestream,
                    length: 10
                },
            ]
        );
    }
}
