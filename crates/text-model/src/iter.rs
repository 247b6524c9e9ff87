//! Sequential views over a buffer.
//!
//! Both iterators read the live buffer one step at a time under its read lock; neither takes a
//! snapshot. Mutating the buffer while an iterator is in flight is not prevented by the iterator
//! itself and produces an unspecified (but memory-safe) sequence.

use crate::buffer::Buffer;
use crate::line_ending::LF;
use crate::row::Row;
use crate::sync::Locking;
use std::iter::FusedIterator;

/// Forward, non-restartable iterator over the characters of a buffer.
///
/// Row boundaries are yielded as `'\n'`, so the sequence has exactly `buffer.len()` items.
pub struct Chars<'a, L: Locking> {
    buffer: &'a Buffer<L>,
    line: usize,
    column: usize,
    done: bool,
}

impl<'a, L: Locking> Chars<'a, L> {
    pub(crate) fn new(buffer: &'a Buffer<L>) -> Self {
        Self {
            buffer,
            line: 1,
            column: 0,
            done: false,
        }
    }
}

impl<L: Locking> Iterator for Chars<'_, L> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        if self.done {
            return None;
        }
        let step = self.buffer.read(|text| {
            if self.line > text.last_line() {
                return None;
            }
            let row = text.row(self.line);
            if let Some(&ch) = row.as_chars().get(self.column) {
                return Some((ch, false));
            }
            (self.line < text.last_line()).then_some((LF, true))
        });
        match step {
            Some((ch, newline)) => {
                if newline {
                    self.line += 1;
                    self.column = 0;
                } else {
                    self.column += 1;
                }
                Some(ch)
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

impl<L: Locking> FusedIterator for Chars<'_, L> {}

/// Iterator over owned copies of a buffer's rows, from line 1 to the last line.
///
/// Each step takes the read lock only long enough to copy one row, so a borrowed row can never
/// outlive the lock. To look at a row without allocating, use [`Buffer::with_row`].
pub struct Rows<'a, L: Locking> {
    buffer: &'a Buffer<L>,
    line: usize,
}

impl<'a, L: Locking> Rows<'a, L> {
    pub(crate) fn new(buffer: &'a Buffer<L>) -> Self {
        Self { buffer, line: 1 }
    }
}

impl<L: Locking> Iterator for Rows<'_, L> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        let row = self.buffer.read(|text| {
            (self.line <= text.last_line()).then(|| text.row(self.line).copy())
        })?;
        self.line += 1;
        Some(row)
    }
}
