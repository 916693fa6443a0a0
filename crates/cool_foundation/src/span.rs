//! Source location tracking.
//!
//! `Span` tracks the byte range and row/column positions of tokens and
//! syntax nodes so errors and trees can point back into the source.

use std::fmt;

/// A position in source text.
///
/// Rows and columns are zero-based; columns count bytes, not characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Point {
    /// Zero-based row.
    pub row: usize,
    /// Zero-based byte column within the row.
    pub column: usize,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Returns the 1-based line number, as shown to users.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.row + 1
    }

    /// Returns the 1-based column number, as shown to users.
    #[must_use]
    pub const fn display_column(&self) -> usize {
        self.column + 1
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.column)
    }
}

/// A span of source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub struct Span {
    /// Byte offset where this span starts.
    pub start: usize,
    /// Byte offset where this span ends (exclusive).
    pub end: usize,
    /// Position of `start`.
    pub start_point: Point,
    /// Position of `end`.
    pub end_point: Point,
}

impl Span {
    /// Creates a new span. `start` must not be past `end`.
    #[must_use]
    pub const fn new(start: usize, end: usize, start_point: Point, end_point: Point) -> Self {
        debug_assert!(start <= end, "span start is past its end");
        Self {
            start,
            end,
            start_point,
            end_point,
        }
    }

    /// Creates a zero-width span at the given offset.
    #[must_use]
    pub const fn empty_at(offset: usize, point: Point) -> Self {
        Self::new(offset, offset, point, point)
    }

    /// Creates a span covering the range from this span to another.
    #[must_use]
    pub fn to(self, other: Self) -> Self {
        Self {
            start: self.start,
            end: other.end.max(self.end),
            start_point: self.start_point,
            end_point: if other.end >= self.end {
                other.end_point
            } else {
                self.end_point
            },
        }
    }

    /// Returns the length of this span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if this span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns true if `offset` falls inside this span.
    #[must_use]
    pub const fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Returns the text this span covers in the given source.
    ///
    /// Returns an empty string if the span does not fit the source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or_default()
    }
}
