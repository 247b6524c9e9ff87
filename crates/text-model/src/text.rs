//! Row sequence and the edit algorithms that operate on it.
//!
//! [`Text`] is the unguarded document: an ordered list of rows plus a cached total length. It
//! never takes locks and never talks to observers; the [`Buffer`](crate::Buffer) wraps it in a
//! locking strategy and fans out the [`TextChange`] values these methods return.
//!
//! Every method that mutates assumes its coordinates were validated with the `check_*` helpers
//! first, so a rejected edit never touches a row.

use crate::change::TextChange;
use crate::error::{Result, TextError};
use crate::line_ending::{LF, LineTerminator, separator_len};
use crate::row::Row;

/// How far past the last character a coordinate may point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bound {
    /// Insertion points and range ends: `column <= line_len`, `index <= len`.
    Insert,
    /// Character reads: `column < line_len` (or the virtual separator), `index < len`.
    Char,
}

#[derive(Debug)]
pub(crate) struct Text {
    rows: Vec<Row>,
    /// Invariant: `len == Σ row.len() + (rows.len() - 1)`.
    len: usize,
}

impl Text {
    pub(crate) fn with_row_capacity(row_capacity: usize) -> Self {
        let mut rows = Vec::with_capacity(row_capacity.max(1));
        rows.push(Row::new());
        Self { rows, len: 0 }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn last_line(&self) -> usize {
        self.rows.len()
    }

    /// Row for a validated 1-based line.
    pub(crate) fn row(&self, line: usize) -> &Row {
        &self.rows[line - 1]
    }

    pub(crate) fn line_len(&self, line: usize) -> usize {
        self.rows[line - 1].len()
    }

    pub(crate) fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn capacity(&self) -> usize {
        self.rows.iter().map(Row::capacity).sum()
    }

    pub(crate) fn ensure_row_capacity(&mut self, min_rows: usize) {
        self.rows.reserve(min_rows.saturating_sub(self.rows.len()));
    }

    pub(crate) fn check_line(&self, line: usize) -> Result<()> {
        if line == 0 || line > self.rows.len() {
            return Err(TextError::LineOutOfRange {
                line,
                last_line: self.rows.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn check_line_column(&self, line: usize, column: usize, bound: Bound) -> Result<()> {
        self.check_line(line)?;
        let line_len = self.line_len(line);
        let ok = match bound {
            Bound::Insert => column <= line_len,
            // The boundary after a non-last row reads as a virtual '\n'.
            Bound::Char => column < line_len || (column == line_len && line < self.rows.len()),
        };
        if !ok {
            return Err(TextError::ColumnOutOfRange {
                line,
                column,
                bound: line_len,
            });
        }
        Ok(())
    }

    pub(crate) fn check_index(&self, index: usize, bound: Bound) -> Result<()> {
        let ok = match bound {
            Bound::Insert => index <= self.len,
            Bound::Char => index < self.len,
        };
        if !ok {
            return Err(TextError::IndexOutOfRange {
                index,
                bound: self.len,
            });
        }
        Ok(())
    }

    /// Character at a validated [`Bound::Char`] coordinate.
    pub(crate) fn char_at(&self, line: usize, column: usize) -> Result<char> {
        let row = self.row(line);
        if column == row.len() {
            return Ok(LF);
        }
        row.get(column)
    }

    /// Insert `text` at a validated position, splitting rows at every separator.
    ///
    /// LF, CR and CRLF each produce one new row; a CRLF's LF is consumed with its CR. The returned
    /// change carries the LF-normalized text, whose length is exactly the growth of the buffer.
    pub(crate) fn insert(&mut self, line: usize, column: usize, text: &str) -> Result<TextChange> {
        let chars: Vec<char> = text.chars().collect();
        let mut stored = String::with_capacity(text.len());
        let (mut work_line, mut work_column) = (line, column);
        let mut i = 0;
        while i < chars.len() {
            let sep = separator_len(&chars, i);
            if sep > 0 {
                let tail = self.rows[work_line - 1].split_off(work_column)?;
                self.rows.insert(work_line, tail);
                work_line += 1;
                work_column = 0;
                stored.push(LF);
                i += sep;
                continue;
            }
            let run_end = (i..chars.len())
                .find(|&j| separator_len(&chars, j) > 0)
                .unwrap_or(chars.len());
            let run = &chars[i..run_end];
            self.rows[work_line - 1].insert_chars(work_column, run)?;
            work_column += run.len();
            stored.extend(run);
            i = run_end;
        }
        self.len += stored.chars().count();
        Ok(TextChange::insert(
            (line, column),
            (work_line, work_column),
            stored,
        ))
    }

    /// Delete a validated, ordered span.
    ///
    /// Multi-line deletes truncate the start row, drop every row up to and including the end row,
    /// and re-attach the end row's tail, so the cost is bounded by the rows touched.
    pub(crate) fn delete(&mut self, start: (usize, usize), end: (usize, usize)) -> Result<TextChange> {
        let removed = self.sub_sequence(start, end)?;
        let (start_line, start_column) = start;
        let (end_line, end_column) = end;
        if start_line == end_line {
            self.rows[start_line - 1].delete(start_column, end_column)?;
        } else {
            let tail = self.rows[end_line - 1].as_chars()[end_column..].to_vec();
            self.rows[start_line - 1].delete_after(start_column)?;
            self.rows.drain(start_line..end_line);
            self.rows[start_line - 1].append_chars(&tail);
        }
        self.len -= removed.chars().count();
        Ok(TextChange::delete(start, end, removed))
    }

    /// Delete one character at a validated [`Bound::Char`] coordinate.
    ///
    /// At the end of a row this removes the virtual separator, merging the next row in.
    pub(crate) fn delete_char_at(&mut self, line: usize, column: usize) -> Result<TextChange> {
        let change = if column < self.line_len(line) {
            let ch = self.rows[line - 1].delete_char_at(column)?;
            TextChange::delete((line, column), (line, column + 1), ch.to_string())
        } else {
            let next = self.rows.remove(line);
            self.rows[line - 1].append_chars(next.as_chars());
            TextChange::delete((line, column), (line + 1, 0), LF.to_string())
        };
        self.len -= 1;
        Ok(change)
    }

    /// Text of a validated, ordered span, with `'\n'` at row boundaries.
    pub(crate) fn sub_sequence(&self, start: (usize, usize), end: (usize, usize)) -> Result<String> {
        let (start_line, start_column) = start;
        let (end_line, end_column) = end;
        if start_line == end_line {
            return self.row(start_line).sub_sequence(start_column, end_column);
        }
        let mut out = self.row(start_line).sub_sequence_after(start_column)?;
        out.push(LF);
        for line in start_line + 1..end_line {
            out.extend(self.row(line).as_chars());
            out.push(LF);
        }
        out.push_str(&self.row(end_line).sub_sequence_before(end_column)?);
        Ok(out)
    }

    /// Reset to a single empty row. Returns the change, or `None` if there was nothing to remove.
    pub(crate) fn clear(&mut self) -> Option<TextChange> {
        if self.len == 0 {
            return None;
        }
        let end = (self.last_line(), self.line_len(self.last_line()));
        let removed = self.render(LineTerminator::Lf);
        self.rows.clear();
        self.rows.push(Row::new());
        self.len = 0;
        Some(TextChange::delete((1, 0), end, removed))
    }

    /// The whole document with rows joined by `terminator`.
    pub(crate) fn render(&self, terminator: LineTerminator) -> String {
        let separator = terminator.as_str();
        let mut out = String::with_capacity(self.len + self.rows.len() * terminator.char_len());
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            out.extend(row.as_chars());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(source: &str) -> Text {
        let mut text = Text::with_row_capacity(4);
        text.insert(1, 0, source).unwrap();
        text
    }

    fn assert_length_invariant(text: &Text) {
        let sum: usize = text.rows().iter().map(Row::len).sum();
        assert_eq!(text.len(), sum + text.last_line() - 1);
    }

    #[test]
    fn test_insert_splits_rows() {
        let text = text("aa\nbcc\na");
        assert_eq!(text.len(), 8);
        assert_eq!(text.last_line(), 3);
        assert_eq!(*text.row(1), "aa");
        assert_eq!(*text.row(2), "bcc");
        assert_eq!(*text.row(3), "a");
        assert_length_invariant(&text);
    }

    #[test]
    fn test_insert_in_middle_moves_tail() {
        let mut text = text("hello world");
        let change = text.insert(1, 5, ",\nbig").unwrap();
        assert_eq!(text.render(LineTerminator::Lf), "hello,\nbig world");
        assert_eq!(change.start(), (1, 5));
        assert_eq!(change.end(), (2, 3));
        assert_length_invariant(&text);
    }

    #[test]
    fn test_insert_crlf_and_cr() {
        let mut text = text("");
        let change = text.insert(1, 0, "a\r\nb\rc").unwrap();
        assert_eq!(text.last_line(), 3);
        assert_eq!(text.len(), 5);
        assert_eq!(change.text, "a\nb\nc");
        assert_length_invariant(&text);
    }

    #[test]
    fn test_delete_across_lines() {
        let mut text = text("aa\nbcc\na");
        let change = text.delete((2, 1), (3, 1)).unwrap();
        assert_eq!(change.text, "cc\na");
        assert_eq!(text.render(LineTerminator::Lf), "aa\nb");
        assert_eq!(text.len(), 4);
        assert_eq!(text.last_line(), 2);
        assert_length_invariant(&text);
    }

    #[test]
    fn test_delete_keeps_end_tail() {
        let mut text = text("one\ntwo\nthree\nfour");
        text.delete((1, 1), (3, 2)).unwrap();
        assert_eq!(text.render(LineTerminator::Lf), "oree\nfour");
        assert_length_invariant(&text);
    }

    #[test]
    fn test_delete_char_at_merges() {
        let mut text = text("ab\ncd");
        let change = text.delete_char_at(1, 2).unwrap();
        assert_eq!(change.text, "\n");
        assert_eq!(change.end(), (2, 0));
        assert_eq!(text.render(LineTerminator::Lf), "abcd");
        assert_eq!(text.last_line(), 1);
        assert_length_invariant(&text);
    }

    #[test]
    fn test_bounds() {
        let text = text("ab\nc");
        assert!(text.check_line_column(1, 2, Bound::Char).is_ok());
        assert_eq!(
            text.check_line_column(2, 1, Bound::Char),
            Err(TextError::ColumnOutOfRange {
                line: 2,
                column: 1,
                bound: 1
            })
        );
        assert!(text.check_line_column(2, 1, Bound::Insert).is_ok());
        assert_eq!(
            text.check_line(3),
            Err(TextError::LineOutOfRange {
                line: 3,
                last_line: 2
            })
        );
        assert!(text.check_line(0).is_err());
        assert!(text.check_index(4, Bound::Insert).is_ok());
        assert!(text.check_index(4, Bound::Char).is_err());
    }

    #[test]
    fn test_render_terminators() {
        let text = text("a\nb\n");
        assert_eq!(text.render(LineTerminator::CrLf), "a\r\nb\r\n");
        assert_eq!(text.render(LineTerminator::Cr), "a\rb\r");
        assert_eq!(text.render(LineTerminator::Nul), "a\0b\0");
    }

    #[test]
    fn test_clear() {
        let mut text = text("x\ny");
        let change = text.clear().unwrap();
        assert_eq!(change.text, "x\ny");
        assert_eq!(change.end(), (2, 1));
        assert_eq!(text.len(), 0);
        assert_eq!(text.last_line(), 1);
        assert!(text.clear().is_none());
    }
}
