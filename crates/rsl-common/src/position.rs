//! Line/column source positions.
//!
//! The type core never reads source text; positions are carried through from
//! the parser so that diagnostics (especially deferred member-access errors)
//! can be attributed to the access expression that triggered them.

use serde::Serialize;
use std::fmt;

/// A zero-based byte offset plus one-based line and zero-based column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[must_use]
    pub const fn new(offset: u32, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// An inclusive start/end range in the source.
///
/// `Range::default()` is the empty range used for synthesized types that have
/// no source counterpart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Length in bytes, saturating for malformed ranges.
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.end.offset.saturating_sub(self.start.offset)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
