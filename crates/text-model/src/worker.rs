//! Line-oriented bulk transfer between buffers and byte streams.
//!
//! Every entry point takes a progress probe: a closure called with the 1-based number of the line
//! just processed. Returning [`ControlFlow::Break`] stops the transfer after that line and the
//! call reports [`Outcome::Aborted`]. An aborted load still leaves a valid buffer holding the lines
//! read so far.
//!
//! ```rust
//! use std::ops::ControlFlow;
//! use text_model::{LineTerminator, worker};
//!
//! let (buffer, outcome) = worker::load("one\r\ntwo\r\n".as_bytes(), |_| ControlFlow::Continue(())).unwrap();
//! assert!(outcome.is_completed());
//! assert_eq!(buffer.last_line(), 3);
//!
//! let mut out = Vec::new();
//! let outcome = worker::save(&buffer, &mut out, LineTerminator::CrLf, |_| ControlFlow::Continue(())).unwrap();
//! assert!(outcome.is_completed());
//! assert_eq!(out, b"one\r\ntwo\r\n");
//! ```

use crate::buffer::{Buffer, LocalBuffer, SyncBuffer};
use crate::error::WorkerError;
use crate::line_ending::{LF, LineTerminator, split_first_line};
use crate::sync::Locking;
use std::io::{BufRead, Write};
use std::ops::ControlFlow;
use tracing::{debug, warn};

/// How a transfer ended.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every line was processed.
    Completed,
    /// The probe stopped the transfer.
    Aborted {
        /// Lines processed before stopping, including the one the probe saw last.
        lines: usize,
    },
}

impl Outcome {
    /// Returns `true` if the transfer ran to the end.
    pub fn is_completed(self) -> bool {
        matches!(self, Outcome::Completed)
    }
}

/// Read `reader` into a fresh buffer.
///
/// The buffer is filled without locking and switched to a [`SyncBuffer`] once populated.
pub fn load<R, P>(reader: R, probe: P) -> Result<(SyncBuffer, Outcome), WorkerError>
where
    R: BufRead,
    P: FnMut(usize) -> ControlFlow<()>,
{
    let buffer = LocalBuffer::new();
    let outcome = load_into(&buffer, reader, probe)?;
    Ok((buffer.into_locking(), outcome))
}

/// Replace the content of `buffer` with the lines of `reader`.
///
/// The buffer's exclusive lock is held for the whole load, so readers on other threads see either
/// the old content or the final loaded content. On an I/O error the lines read so far remain.
pub fn load_into<L, R, P>(buffer: &Buffer<L>, mut reader: R, mut probe: P) -> Result<Outcome, WorkerError>
where
    L: Locking,
    R: BufRead,
    P: FnMut(usize) -> ControlFlow<()>,
{
    debug!(thread_safe = L::THREAD_SAFE, "loading buffer");
    buffer.edit(|edit| {
        edit.clear();
        let mut chunk = String::new();
        let mut lines = 0;
        loop {
            chunk.clear();
            // A chunk ends at LF or at the end of input, so a CR at its end is never half of a
            // CRLF pair.
            if reader.read_line(&mut chunk)? == 0 {
                break;
            }
            let mut rest = chunk.as_str();
            while !rest.is_empty() {
                let (line, tail) = split_first_line(rest);
                edit.append(line);
                lines += 1;
                if probe(lines).is_break() {
                    warn!(lines, "load aborted by probe");
                    return Ok(Outcome::Aborted { lines });
                }
                rest = tail;
            }
        }
        debug!(lines, chars = edit.text().len(), "loaded buffer");
        Ok(Outcome::Completed)
    })
}

/// Write every row of `buffer` to `writer`, joined by `terminator`.
///
/// The buffer's read lock is held for the whole save. No terminator follows the last row.
pub fn save<L, W, P>(
    buffer: &Buffer<L>,
    mut writer: W,
    terminator: LineTerminator,
    mut probe: P,
) -> Result<Outcome, WorkerError>
where
    L: Locking,
    W: Write,
    P: FnMut(usize) -> ControlFlow<()>,
{
    buffer.read(|text| {
        debug!(lines = text.last_line(), ?terminator, "saving buffer");
        let separator = terminator.as_str().as_bytes();
        let mut encoded = String::new();
        for (i, row) in text.rows().iter().enumerate() {
            if i > 0 {
                writer.write_all(separator)?;
            }
            encoded.clear();
            encoded.extend(row.as_chars());
            writer.write_all(encoded.as_bytes())?;
            if probe(i + 1).is_break() && i + 1 < text.last_line() {
                writer.flush()?;
                warn!(lines = i + 1, "save aborted by probe");
                return Ok(Outcome::Aborted { lines: i + 1 });
            }
        }
        writer.flush()?;
        debug!(chars = text.len(), "saved buffer");
        Ok(Outcome::Completed)
    })
}

/// Duplicate `buffer` row by row into a fresh [`SyncBuffer`].
///
/// Observers and cached anchors are not copied.
pub fn copy<L, P>(buffer: &Buffer<L>, mut probe: P) -> (SyncBuffer, Outcome)
where
    L: Locking,
    P: FnMut(usize) -> ControlFlow<()>,
{
    let copied = LocalBuffer::with_capacity(buffer.last_line());
    let outcome = buffer.read(|text| {
        copied.edit(|edit| {
            let last_line = text.last_line();
            let mut row_text = String::new();
            for (i, row) in text.rows().iter().enumerate() {
                row_text.clear();
                row_text.extend(row.as_chars());
                if i + 1 < last_line {
                    row_text.push(LF);
                }
                edit.append(&row_text);
                if probe(i + 1).is_break() && i + 1 < last_line {
                    warn!(lines = i + 1, "copy aborted by probe");
                    return Outcome::Aborted { lines: i + 1 };
                }
            }
            debug!(lines = last_line, chars = text.len(), "copied buffer");
            Outcome::Completed
        })
    });
    (copied.into_locking(), outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proceed(_: usize) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    #[test]
    fn test_load_mixed_terminators() {
        let (buffer, outcome) = load("a\nb\r\nc\rd".as_bytes(), proceed).unwrap();
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(buffer.to_string(), "a\nb\nc\nd");
        assert!(buffer.is_thread_safe());
    }

    #[test]
    fn test_load_abort_keeps_lines_read() {
        let (buffer, outcome) =
            load("1\n2\n3\n4\n".as_bytes(), |line| {
                if line == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();
        assert_eq!(outcome, Outcome::Aborted { lines: 2 });
        assert_eq!(buffer.to_string(), "1\n2\n");
        assert_eq!(buffer.last_line(), 3);
    }

    #[test]
    fn test_load_splits_lone_cr_lines() {
        let mut seen = Vec::new();
        let (buffer, outcome) = load("a\rb\rc".as_bytes(), |line| {
            seen.push(line);
            ControlFlow::Continue(())
        })
        .unwrap();
        assert!(outcome.is_completed());
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(buffer.to_string(), "a\nb\nc");

        let (buffer, outcome) = load("a\rb\rc".as_bytes(), |_| ControlFlow::Break(())).unwrap();
        assert_eq!(outcome, Outcome::Aborted { lines: 1 });
        assert_eq!(buffer.to_string(), "a\n");
    }

    #[test]
    fn test_load_empty_source() {
        let (buffer, outcome) = load("".as_bytes(), proceed).unwrap();
        assert!(outcome.is_completed());
        assert_eq!(buffer.last_line(), 1);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_load_into_replaces_content() {
        let buffer = LocalBuffer::from_text("old\ntext");
        let outcome = load_into(&buffer, "new".as_bytes(), proceed).unwrap();
        assert!(outcome.is_completed());
        assert_eq!(buffer.to_string(), "new");
    }

    #[test]
    fn test_save_with_terminator() {
        let buffer = LocalBuffer::from_text("a\nb\n");
        let mut out = Vec::new();
        let outcome = save(&buffer, &mut out, LineTerminator::Nul, proceed).unwrap();
        assert!(outcome.is_completed());
        assert_eq!(out, b"a\0b\0");
    }

    #[test]
    fn test_save_abort() {
        let buffer = LocalBuffer::from_text("a\nb\nc");
        let mut out = Vec::new();
        let outcome = save(&buffer, &mut out, LineTerminator::Lf, |_| ControlFlow::Break(())).unwrap();
        assert_eq!(outcome, Outcome::Aborted { lines: 1 });
        assert_eq!(out, b"a");
    }

    #[test]
    fn test_copy_is_independent() {
        let source = SyncBuffer::from_text("x\ny\n\nz");
        let (copied, outcome) = copy(&source, proceed);
        assert!(outcome.is_completed());
        assert_eq!(copied.to_string(), source.to_string());
        copied.append("!");
        assert_eq!(source.to_string(), "x\ny\n\nz");
    }
}
