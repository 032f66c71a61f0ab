//! File helpers: probe-first reading and in-place container stripping

use crate::codestream::strip;
use jxl_core::consts::{LEVEL_10, PROBE_LEN};
use jxl_core::{BitstreamKind, JxlResult};
use jxl_headers::sniff;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Sniff the first bytes of `reader` and only read the rest if they belong
/// to a JPEG XL bitstream. Returns the kind and the whole input.
pub fn read_probe_then_rest<R: Read>(mut reader: R) -> JxlResult<(BitstreamKind, Vec<u8>)> {
    let mut data = Vec::with_capacity(PROBE_LEN);
    reader.by_ref().take(PROBE_LEN as u64).read_to_end(&mut data)?;

    let kind = sniff(&data)?;
    reader.read_to_end(&mut data)?;
    Ok((kind, data))
}

/// Options for [`strip_file`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StripOptions {
    /// Strip level-10 containers too. Level-10 images may depend on the
    /// container, so they are left alone by default.
    pub force: bool,
    /// Do every check but leave the file untouched
    pub dry_run: bool,
}

/// What [`strip_file`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripOutcome {
    AlreadyStripped,
    Stripped { original_len: u64, stripped_len: u64 },
    DryRun { original_len: u64, stripped_len: u64 },
    SkippedLevel10,
}

/// Replace a container file with its bare codestream.
///
/// The codestream is written to a temporary file next to `path` which is
/// then renamed over it, so a failure part-way leaves the original intact.
pub fn strip_file<P: AsRef<Path>>(path: P, options: &StripOptions) -> JxlResult<StripOutcome> {
    let path = path.as_ref();
    let (kind, data) = read_probe_then_rest(File::open(path)?)?;

    if kind == BitstreamKind::RawCodestream {
        tracing::debug!(path = %path.display(), "already stripped");
        return Ok(StripOutcome::AlreadyStripped);
    }

    let stripped = strip(&data)?;
    let level = stripped.container.as_ref().and_then(|c| c.level);
    if level == Some(LEVEL_10) && !options.force {
        tracing::debug!(path = %path.display(), "level 10 image, not stripping");
        return Ok(StripOutcome::SkippedLevel10);
    }

    let original_len = data.len() as u64;
    let stripped_len = stripped.codestream.len() as u64;
    if options.dry_run {
        return Ok(StripOutcome::DryRun {
            original_len,
            stripped_len,
        });
    }

    write_atomically(path, stripped.codestream.as_bytes())?;
    tracing::debug!(path = %path.display(), original_len, stripped_len, "stripped container");

    Ok(StripOutcome::Stripped {
        original_len,
        stripped_len,
    })
}

/// Write `contents` to a sibling temporary file and rename it over `path`,
/// keeping the original permissions.
pub fn write_atomically(path: &Path, contents: &[u8]) -> JxlResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions())?;
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
