//! Coordinates.
//!
//! The buffer can be addressed two ways: by a 0-based flat character index, where every row
//! boundary counts as one character, or by a 1-based line plus a 0-based column. [`Location`]
//! carries either form across the API; internally everything is resolved to a validated
//! [`Position`] before any storage is touched.

/// A fully resolved coordinate: line, column and the matching flat index.
///
/// The position indexer caches these as anchors. A `Position` handed out by the buffer describes
/// the document at the moment it was produced and is stale after any mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// 1-based line.
    pub line: usize,
    /// 0-based column within the line.
    pub column: usize,
    /// 0-based flat character index.
    pub index: usize,
}

impl Position {
    /// Create a position.
    pub fn new(line: usize, column: usize, index: usize) -> Self {
        Self {
            line,
            column,
            index,
        }
    }

    /// The start of the document: line 1, column 0, index 0.
    pub fn zero() -> Self {
        Self::new(1, 0, 0)
    }

    /// Flat index of the first character of this position's line.
    pub(crate) fn line_start(&self) -> usize {
        self.index - self.column
    }
}

/// A buffer address in either addressing scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// 0-based flat character index.
    Index(usize),
    /// 1-based line and 0-based column.
    LineColumn {
        /// 1-based line.
        line: usize,
        /// 0-based column.
        column: usize,
    },
}

impl Location {
    /// Address by line and column.
    pub fn line_column(line: usize, column: usize) -> Self {
        Self::LineColumn { line, column }
    }
}

impl From<usize> for Location {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<(usize, usize)> for Location {
    fn from((line, column): (usize, usize)) -> Self {
        Self::LineColumn { line, column }
    }
}

impl From<Position> for Location {
    fn from(position: Position) -> Self {
        Self::LineColumn {
            line: position.line,
            column: position.column,
        }
    }
}
