//! # Path Lexer
//!
//! Scans a path pattern into [`Segment`]s. A segment is a run of name
//! characters (letters, digits, `_`, `*`, `@`, `$`, `-`), optionally followed
//! immediately by a bracketed subscript. The subscript ends at the first `]`,
//! so it may contain dots but never a literal closing bracket. Everything else
//! in the pattern only separates segments.
use crate::tokenizer::Segment;

/// A lexer over the bytes of a single path pattern. Each call to [`tokenize`]
/// builds a fresh lexer, so no scan state survives between patterns.
struct Lexer<'p> {
    /// The pattern being scanned
    input: &'p str,
    /// Current position (current byte)
    position: usize,
    /// Current reading position (after current byte)
    read_position: usize,
    /// Current byte under examination
    byte: u8,
}

/// Returns whether the byte may appear in a segment name.
const fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'*' | b'@' | b'$' | b'-')
}

impl<'p> Lexer<'p> {
    fn new(input: &'p str) -> Self {
        let mut lexer = Self {
            input,
            position: 0,
            read_position: 0,
            byte: 0,
        };
        lexer.read_byte();
        lexer
    }

    /// Reads and consumes the next byte in the pattern.
    fn read_byte(&mut self) {
        self.byte = self
            .input
            .as_bytes()
            .get(self.read_position)
            .copied()
            .unwrap_or(0);
        self.position = self.read_position;
        self.read_position += 1;
    }

    const fn at_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Skips everything that cannot start a segment.
    fn skip_separators(&mut self) {
        while !self.at_eof() && !is_name_byte(self.byte) {
            self.read_byte();
        }
    }

    /// Returns the next segment, or `None` once the pattern is exhausted.
    fn next_segment(&mut self) -> Option<Segment<'p>> {
        self.skip_separators();
        if self.at_eof() {
            return None;
        }

        let start = self.position;
        while !self.at_eof() && is_name_byte(self.byte) {
            self.read_byte();
        }
        let name = &self.input[start..self.position];

        let Some(condition) = self.read_subscript() else {
            return Some(if name == "*" {
                Segment::Wildcard
            } else {
                Segment::Field(name)
            });
        };
        let raw = &self.input[start..self.position];

        if condition.bytes().all(|b| b.is_ascii_digit()) {
            // an index too large for usize can never be in range
            let index = condition.parse::<usize>().unwrap_or(usize::MAX);
            Some(Segment::Indexed { raw, name, index })
        } else {
            Some(Segment::Conditioned {
                raw,
                name,
                condition,
            })
        }
    }

    /// Reads a `[...]` subscript directly after a name, returning its
    /// contents. The subscript needs at least one byte of content and ends at
    /// the first `]` after that byte. Without a closing bracket nothing is
    /// consumed.
    fn read_subscript(&mut self) -> Option<&'p str> {
        if self.byte != b'[' {
            return None;
        }
        let open = self.position;
        let content_start = open + 1;
        let close = self
            .input
            .as_bytes()
            .get(content_start + 1..)?
            .iter()
            .position(|&b| b == b']')
            .map(|offset| content_start + 1 + offset)?;

        while self.position <= close {
            self.read_byte();
        }
        Some(&self.input[content_start..close])
    }
}

/// Tokenize a path pattern into its ordered segments.
///
/// An empty pattern, or one without any name characters, yields no segments,
/// which callers treat as "no match".
///
/// # Examples
///
/// ```
/// use jpath::tokenizer::{Segment, tokenize};
///
/// let segments = tokenize("a.b[x.y>1].c[0]");
/// assert_eq!(segments.len(), 3);
/// assert_eq!(segments[0], Segment::Field("a"));
/// assert!(matches!(segments[1], Segment::Conditioned { condition: "x.y>1", .. }));
/// assert!(matches!(segments[2], Segment::Indexed { name: "c", index: 0, .. }));
/// ```
#[must_use]
pub fn tokenize(pattern: &str) -> Vec<Segment<'_>> {
    let mut lexer = Lexer::new(pattern);
    let mut segments = vec![];
    while let Some(segment) = lexer.next_segment() {
        segments.push(segment);
    }
    log::trace!("tokenized `{pattern}` into {segments:?}");
    segments
}
