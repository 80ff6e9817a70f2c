//! Session identifiers.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::ProtocolError;

/// Bare identifier length: 32 hex digits plus 4 group separators.
const BARE_LEN: usize = 36;

/// Positions of the `-` separators in the bare form (8-4-4-4-12 groups).
const DASH_POSITIONS: [usize; 4] = [8, 13, 18, 23];

/// A session identifier: a 128-bit value in the canonical form
/// `{XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX}` (uppercase hex).
///
/// Input accepts optional surrounding braces and either hex case; the
/// identifier is normalized to bare uppercase internally, so two inputs
/// that differ only in braces or case are the same session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generates a fresh random identifier.
    ///
    /// Practically unique; collisions are an accepted, unmitigated risk.
    pub fn generate() -> Self {
        SessionId(Uuid::new_v4().to_string().to_ascii_uppercase())
    }

    /// The 36-character identifier without braces (also the content file name).
    pub fn bare(&self) -> &str {
        &self.0
    }

    /// The brace-delimited protocol-visible form.
    pub fn braced(&self) -> String {
        format!("{{{}}}", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ProtocolError::InvalidSessionId(s.to_string());

        // Braces must be absent or balanced.
        let bare = match (s.starts_with('{'), s.ends_with('}')) {
            (true, true) => &s[1..s.len() - 1],
            (false, false) => s,
            _ => return Err(invalid()),
        };

        if bare.len() != BARE_LEN {
            return Err(invalid());
        }
        for (i, b) in bare.bytes().enumerate() {
            if DASH_POSITIONS.contains(&i) {
                if b != b'-' {
                    return Err(invalid());
                }
            } else if !b.is_ascii_hexdigit() {
                return Err(invalid());
            }
        }

        Ok(SessionId(bare.to_ascii_uppercase()))
    }
}
