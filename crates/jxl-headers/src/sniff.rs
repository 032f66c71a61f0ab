//! Bitstream classification from the first bytes of a file

use jxl_core::consts::{CODESTREAM_SIGNATURE, CONTAINER_SIGNATURE};
use jxl_core::{BitstreamKind, FormatError};

/// Classify a bitstream from its leading bytes.
///
/// Only [`jxl_core::consts::PROBE_LEN`] bytes are needed; longer slices are
/// accepted and the tail is ignored. The two signatures cannot both match:
/// a container always starts with `0x00`.
pub fn sniff(prefix: &[u8]) -> Result<BitstreamKind, FormatError> {
    let kind = if prefix.starts_with(&CODESTREAM_SIGNATURE) {
        BitstreamKind::RawCodestream
    } else if prefix.starts_with(&CONTAINER_SIGNATURE) {
        BitstreamKind::BoxedContainer
    } else {
        return Err(FormatError::NotRecognized);
    };

    tracing::debug!(%kind, "sniffed bitstream");
    Ok(kind)
}
