//! Interface Identifiers
//!
//! Identifiers are opaque 128-bit values written in their canonical text
//! form, `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX`, optionally wrapped in
//! braces. Hex digits are case-insensitive.

use core::fmt;

/// 128-bit identifier naming one interface.
pub use uuid::Uuid as Guid;

/// Length of the hyphenated canonical form.
const CANONICAL_LEN: usize = 36;

/// Error type for identifier parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuidError {
    /// The text is not 36 characters long (38 with braces).
    InvalidLength(usize),
    /// Opening or closing brace without its partner.
    UnbalancedBraces,
    /// The groups or digits do not form an identifier.
    Malformed,
}

impl fmt::Display for GuidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(len) => write!(f, "expected 36 characters, found {}", len),
            Self::UnbalancedBraces => write!(f, "unbalanced braces"),
            Self::Malformed => write!(f, "malformed identifier groups"),
        }
    }
}

/// Parse an identifier from its canonical text form.
///
/// Only the hyphenated 8-4-4-4-12 layout is accepted, so two distinct
/// strings that parse successfully always differ in value unless they
/// differ only in letter case or braces.
pub fn parse_canonical(text: &str) -> Result<Guid, GuidError> {
    let body = match (text.strip_prefix('{'), text.ends_with('}')) {
        (Some(rest), true) => &rest[..rest.len() - 1],
        (None, false) => text,
        _ => return Err(GuidError::UnbalancedBraces),
    };

    if body.len() != CANONICAL_LEN {
        return Err(GuidError::InvalidLength(body.len()));
    }

    Guid::parse_str(body).map_err(|_| GuidError::Malformed)
}
