//! Writing range-addressed fragments into the session content file.

use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use bitsd_protocol::FragmentRange;

use crate::TransferError;

/// Writes one fragment at its declared offset into the content file.
///
/// Opens the file for random-access writing (creating it if absent,
/// never truncating), seeks to `range.start`, and writes `payload`.
/// Fragments may arrive in any order; bytes outside the written range
/// are left untouched (the filesystem zero-fills any gap before an
/// offset past the current end).
///
/// Returns the next expected start offset, `range.end + 1`. This is a
/// pure echo of the declaration; it does not verify that earlier
/// offsets were ever filled.
///
/// The protocol carries no payload length independent of the HTTP body,
/// so a body shorter or longer than the declared range is written as
/// received and only logged.
pub fn write_fragment(
    dir: &Path,
    content_name: &str,
    range: &FragmentRange,
    payload: &[u8],
) -> Result<u64, TransferError> {
    if payload.len() as u64 != range.byte_len() {
        tracing::warn!(
            declared = range.byte_len(),
            received = payload.len(),
            "fragment body length differs from declared range"
        );
    }

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(dir.join(content_name))?;
    file.seek(SeekFrom::Start(range.start))?;
    file.write_all(payload)?;

    Ok(range.next_offset())
}
