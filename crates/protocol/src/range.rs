//! Content-range declarations for fragment packets.

use std::fmt;
use std::str::FromStr;

use crate::ProtocolError;

/// A fragment's byte range declaration: `bytes start-end/total`.
///
/// `end` is inclusive. Invariant (enforced at parse time):
/// `start <= end < total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentRange {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl FragmentRange {
    /// Number of bytes the range declares.
    pub fn byte_len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// The offset the client should use as the start of its next fragment.
    ///
    /// This is a pure contract value (`end + 1`); it does not assert that
    /// earlier offsets were ever filled.
    pub fn next_offset(&self) -> u64 {
        self.end + 1
    }
}

impl fmt::Display for FragmentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bytes {}-{}/{}", self.start, self.end, self.total)
    }
}

fn parse_decimal(s: &str) -> Option<u64> {
    // Reject signs and other non-digit forms u64::from_str would accept.
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl FromStr for FragmentRange {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ProtocolError::InvalidRange(s.to_string());

        let rest = s.strip_prefix("bytes").ok_or_else(invalid)?;
        let trimmed = rest.trim_start();
        // At least one whitespace character between the unit and the range.
        if trimmed.len() == rest.len() {
            return Err(invalid());
        }

        let (range_part, total_part) = trimmed.split_once('/').ok_or_else(invalid)?;
        let (start_part, end_part) = range_part.split_once('-').ok_or_else(invalid)?;

        let start = parse_decimal(start_part).ok_or_else(invalid)?;
        let end = parse_decimal(end_part).ok_or_else(invalid)?;
        let total = parse_decimal(total_part).ok_or_else(invalid)?;

        if start > end || end >= total {
            return Err(invalid());
        }

        Ok(FragmentRange { start, end, total })
    }
}
