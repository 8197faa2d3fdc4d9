//! # Path Segment
//!
//! Defines the possible segments of a path pattern. Segments borrow from the
//! pattern they were lexed from.
use std::fmt::Display;

/// Represents one dot-delimited component of a path pattern.
///
/// Every variant keeps access to the raw text of the segment (see
/// [`Segment::raw`]) because a map key spelled exactly like the whole segment,
/// brackets included, takes precedence over the bracketed interpretation.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Segment<'p> {
    /// Key access by exact name, e.g., "foo"
    Field(&'p str),

    /// The bare wildcard "*"
    Wildcard,

    /// Positional access into a named sequence, e.g., "foo\[3\]"
    Indexed {
        /// The whole segment text
        raw: &'p str,
        /// Key holding the sequence
        name: &'p str,
        /// 0-based position
        index: usize,
    },

    /// Filtered access, e.g., "foo\[bar>1\]" or "*\[bar>1\]"
    Conditioned {
        /// The whole segment text
        raw: &'p str,
        /// Key holding the candidates, or "*" for the current node
        name: &'p str,
        /// Text between the brackets
        condition: &'p str,
    },
}

impl<'p> Segment<'p> {
    /// Returns the segment exactly as it was written in the pattern.
    #[must_use]
    pub const fn raw(&self) -> &'p str {
        match self {
            Segment::Field(raw)
            | Segment::Indexed { raw, .. }
            | Segment::Conditioned { raw, .. } => *raw,
            Segment::Wildcard => "*",
        }
    }
}

impl Display for Segment<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw())
    }
}
