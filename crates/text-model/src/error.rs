//! Error types.
//!
//! Bounds failures are reported with one variant per coordinate kind so callers can tell a bad
//! flat index apart from a bad line or a bad column. Every operation validates before it writes,
//! so any `Err` leaves the buffer unchanged.

use thiserror::Error;

/// Errors produced by [`Row`](crate::Row), [`Buffer`](crate::Buffer) and the position indexer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("index out of range: {index} (bound {bound})")]
    /// A flat character index (or row-local index) lies outside its valid bound.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The length the index was checked against.
        bound: usize,
    },

    #[error("line out of range: {line} (last line {last_line})")]
    /// A line number lies outside `1..=last_line`.
    LineOutOfRange {
        /// The offending 1-based line.
        line: usize,
        /// The buffer's last line at the time of the call.
        last_line: usize,
    },

    #[error("column out of range: line {line}, column {column} (bound {bound})")]
    /// A column lies outside the valid bound of its line.
    ColumnOutOfRange {
        /// The (valid) line the column was checked against.
        line: usize,
        /// The offending 0-based column.
        column: usize,
        /// The length of the line.
        bound: usize,
    },

    #[error("invalid range: start {start} is after end {end}")]
    /// A range whose start lies after its end (both as flat indices).
    InvalidRange {
        /// Flat index of the start.
        start: usize,
        /// Flat index of the end.
        end: usize,
    },

    #[error("internal consistency fault: {0}")]
    /// The buffer or its index reached a state a correct implementation never produces.
    Internal(&'static str),
}

/// Errors produced by the stream [`worker`](crate::worker).
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("I/O error: {0}")]
    /// Reading from the source or writing to the sink failed.
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// A buffer operation failed while loading or saving.
    Text(#[from] TextError),
}

/// Result alias used throughout the crate.
pub type Result<T, E = TextError> = std::result::Result<T, E>;
