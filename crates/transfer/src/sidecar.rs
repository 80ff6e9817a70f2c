//! Optional per-session metadata sidecars.

use std::path::Path;

use crate::TransferError;

/// Which metadata sidecar to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidecarKind {
    /// `<content>.Content-Name`
    Name,
    /// `<content>.Content-Encoding`
    Encoding,
}

impl SidecarKind {
    /// File name suffix, matching the wire header name.
    pub fn suffix(&self) -> &'static str {
        match self {
            SidecarKind::Name => "Content-Name",
            SidecarKind::Encoding => "Content-Encoding",
        }
    }
}

/// Writes a metadata sidecar next to the content file.
///
/// Truncate-and-write: when the same header appears on several
/// fragments, the last occurrence wins. Callers treat failures as
/// non-fatal to the enclosing fragment transition.
pub fn write_sidecar(
    dir: &Path,
    content_name: &str,
    kind: SidecarKind,
    value: &str,
) -> Result<(), TransferError> {
    let path = dir.join(format!("{content_name}.{}", kind.suffix()));
    std::fs::write(path, value)?;
    Ok(())
}
