//! The line-addressable character buffer.
//!
//! # Overview
//!
//! [`Buffer`] is an ordered sequence of [`Row`]s with a cached total length, a position
//! indexer, and an owned list of mutation observers. Every operation accepts a [`Location`]
//! (flat index or 1-based line plus 0-based column) and resolves it through one validated path
//! before any row is touched: a rejected call leaves the buffer unchanged.
//!
//! Row boundaries are not stored. Each one is addressable as a virtual `'\n'` sitting at
//! `column == row.len()` of every row but the last, so
//! `len() == Σ row.len() + (last_line() - 1)` always holds.
//!
//! # Locking
//!
//! The locking strategy is a type parameter. A [`SyncBuffer`] (`Buffer<Locked>`) takes a shared
//! lock for reads and an exclusive lock for the full duration of a mutation, including observer
//! notification. A [`LocalBuffer`] (`Buffer<Unlocked>`) takes no locks and cannot be shared
//! across threads.
//!
//! # Example
//!
//! ```rust
//! use text_model::{Location, SyncBuffer};
//!
//! let buffer = SyncBuffer::from_text("aa\nbcc\na");
//! assert_eq!(buffer.len(), 8);
//! assert_eq!(buffer.last_line(), 3);
//!
//! buffer.delete((2, 1), (3, 1)).unwrap();
//! assert_eq!(buffer.to_string(), "aa\nb");
//!
//! buffer.insert(Location::Index(4), "!").unwrap();
//! assert_eq!(buffer.get((2, 1)).unwrap(), '!');
//! ```

use crate::change::{BufferObserver, FnObserver, ObserverId, ObserverList, TextChange};
use crate::error::{Result, TextError};
use crate::indexer::{DEFAULT_CACHE_CAPACITY, PositionIndexer};
use crate::iter::{Chars, Rows};
use crate::line_ending::LineTerminator;
use crate::position::{Location, Position};
use crate::row::Row;
use crate::sync::{Locked, Locking, Unlocked};
use crate::text::{Bound, Text};
use std::fmt;
use tracing::{debug, error, trace};

/// A buffer shared across threads behind reader/writer locking.
pub type SyncBuffer = Buffer<Locked>;

/// A single-threaded buffer with no locking.
pub type LocalBuffer = Buffer<Unlocked>;

/// Construction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferOptions {
    /// Initial capacity of the row list.
    pub row_capacity: usize,
    /// Maximum number of cached anchors in the position indexer.
    pub cache_capacity: usize,
    /// Whether the position indexer caches anchors at all.
    pub caching: bool,
}

impl BufferOptions {
    /// Default row list capacity.
    pub const DEFAULT_ROW_CAPACITY: usize = 50;

    /// Set the initial row list capacity.
    pub fn with_row_capacity(mut self, row_capacity: usize) -> Self {
        self.row_capacity = row_capacity;
        self
    }

    /// Set the anchor cache capacity.
    pub fn with_cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }

    /// Enable or disable anchor caching.
    pub fn with_caching(mut self, caching: bool) -> Self {
        self.caching = caching;
        self
    }
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            row_capacity: Self::DEFAULT_ROW_CAPACITY,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            caching: true,
        }
    }
}

/// State behind the buffer's main lock.
pub(crate) struct State {
    pub(crate) text: Text,
    observers: ObserverList,
}

/// Line-addressable character buffer. See the [module docs](self).
pub struct Buffer<L: Locking = Locked> {
    state: L::Cell<State>,
    // Separate cell so lookups under a shared lock can still update the cache.
    // Lock order: `state` then `indexer`.
    indexer: L::Cell<PositionIndexer>,
}

impl<L: Locking> Buffer<L> {
    /// Create an empty buffer with default options.
    pub fn new() -> Self {
        Self::with_options(BufferOptions::default())
    }

    /// Create an empty buffer whose row list can hold `row_capacity` rows without reallocating.
    pub fn with_capacity(row_capacity: usize) -> Self {
        Self::with_options(BufferOptions::default().with_row_capacity(row_capacity))
    }

    /// Create an empty buffer.
    pub fn with_options(options: BufferOptions) -> Self {
        let text = Text::with_row_capacity(options.row_capacity.max(BufferOptions::DEFAULT_ROW_CAPACITY));
        let mut indexer = PositionIndexer::new(options.cache_capacity, options.caching);
        indexer.refresh_end(&text);
        debug!(
            thread_safe = L::THREAD_SAFE,
            row_capacity = options.row_capacity,
            cache_capacity = options.cache_capacity,
            "created buffer"
        );
        Self {
            state: L::new_cell(State {
                text,
                observers: ObserverList::default(),
            }),
            indexer: L::new_cell(indexer),
        }
    }

    /// Create a buffer holding `text`.
    pub fn from_text(text: &str) -> Self {
        let buffer = Self::with_capacity(text.len() / 32);
        buffer.append(text);
        buffer
    }

    /// Whether this buffer uses locking.
    pub fn is_thread_safe(&self) -> bool {
        L::THREAD_SAFE
    }

    /// Switch locking strategy, keeping content, observers and cached anchors.
    pub fn into_locking<M: Locking>(self) -> Buffer<M> {
        debug!(
            from = L::THREAD_SAFE,
            to = M::THREAD_SAFE,
            "switching buffer locking"
        );
        Buffer {
            state: M::new_cell(L::into_inner(self.state)),
            indexer: M::new_cell(L::into_inner(self.indexer)),
        }
    }

    /// Total length in characters, counting one per row boundary.
    pub fn len(&self) -> usize {
        self.read(|text| text.len())
    }

    /// Returns `true` if the buffer holds no characters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat index of the last character, or `None` when empty.
    pub fn last_index(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }

    /// Number of lines (rows). Always at least 1.
    pub fn last_line(&self) -> usize {
        self.read(|text| text.last_line())
    }

    /// Length of `line` in characters, excluding its separator.
    pub fn line_len(&self, line: usize) -> Result<usize> {
        self.read(|text| {
            text.check_line(line)?;
            Ok(text.line_len(line))
        })
    }

    /// An owned copy of `line`'s row.
    pub fn row(&self, line: usize) -> Result<Row> {
        self.with_row(line, Row::copy)
    }

    /// Run `f` against `line`'s row under the read lock.
    pub fn with_row<R>(&self, line: usize, f: impl FnOnce(&Row) -> R) -> Result<R> {
        self.read(|text| {
            text.check_line(line)?;
            Ok(f(text.row(line)))
        })
    }

    /// Total physical capacity of all rows, in characters.
    pub fn capacity(&self) -> usize {
        self.read(|text| text.capacity())
    }

    /// Make room in the row list for at least `rows` rows.
    pub fn ensure_row_capacity(&self, rows: usize) {
        L::write(&self.state, |state| state.text.ensure_row_capacity(rows));
    }

    /// Character at `at`. A column equal to a non-last row's length reads as `'\n'`.
    pub fn get(&self, at: impl Into<Location>) -> Result<char> {
        let at = at.into();
        L::read(&self.state, |state| {
            let (line, column) = self.resolve_in(&state.text, at, Bound::Char)?;
            state.text.char_at(line, column)
        })
    }

    /// Text between `start` and `end`, with `'\n'` at row boundaries.
    pub fn sub_sequence(
        &self,
        start: impl Into<Location>,
        end: impl Into<Location>,
    ) -> Result<String> {
        let (start, end) = (start.into(), end.into());
        L::read(&self.state, |state| {
            let (start, end) = self.resolve_range_in(&state.text, start, end)?;
            state.text.sub_sequence(start, end)
        })
    }

    /// Resolve any location to a full position.
    pub fn resolve(&self, at: impl Into<Location>) -> Result<Position> {
        let at = at.into();
        L::read(&self.state, |state| {
            let (line, column) = self.resolve_in(&state.text, at, Bound::Insert)?;
            L::write(&self.indexer, |indexer| {
                indexer.resolve_line_column(&state.text, line, column)
            })
        })
    }

    /// Line and column of a flat index (`0 <= index <= len`).
    pub fn position_of(&self, index: usize) -> Result<Position> {
        self.resolve(Location::Index(index))
    }

    /// Flat index of a line and column (`column <= line_len`).
    pub fn index_of(&self, line: usize, column: usize) -> Result<usize> {
        Ok(self.resolve(Location::line_column(line, column))?.index)
    }

    /// Insert `text` at `at`. LF, CR and CRLF each start a new line.
    pub fn insert(&self, at: impl Into<Location>, text: &str) -> Result<()> {
        let at = at.into();
        self.edit(|edit| edit.insert(at, text))
    }

    /// Append `text` at the end of the buffer.
    pub fn append(&self, text: &str) {
        self.edit(|edit| edit.append(text));
    }

    /// Delete the text between `start` and `end`, returning it.
    pub fn delete(&self, start: impl Into<Location>, end: impl Into<Location>) -> Result<String> {
        let (start, end) = (start.into(), end.into());
        self.edit(|edit| edit.delete(start, end))
    }

    /// Delete the character at `at`. At the end of a non-last line this joins the next line.
    pub fn delete_char_at(&self, at: impl Into<Location>) -> Result<char> {
        let at = at.into();
        self.edit(|edit| edit.delete_char_at(at))
    }

    /// Remove all content, leaving one empty line.
    pub fn clear(&self) {
        self.edit(|edit| edit.clear());
    }

    /// The whole text with rows joined by `terminator`.
    pub fn to_string_with(&self, terminator: LineTerminator) -> String {
        self.read(|text| text.render(terminator))
    }

    /// Forward iterator over the characters of the live buffer.
    pub fn chars(&self) -> Chars<'_, L> {
        Chars::new(self)
    }

    /// Iterator over copies of every row, line 1 first.
    pub fn rows(&self) -> Rows<'_, L> {
        Rows::new(self)
    }

    /// Register an observer. Observers run in registration order after every mutation.
    pub fn add_observer(&self, observer: impl BufferObserver + 'static) -> ObserverId {
        L::write(&self.state, |state| state.observers.add(Box::new(observer)))
    }

    /// Register a closure called after every insert and delete.
    pub fn subscribe<F>(&self, callback: F) -> ObserverId
    where
        F: FnMut(&TextChange) + Send + Sync + 'static,
    {
        self.add_observer(FnObserver(callback))
    }

    /// Unregister an observer. Returns `false` if it was not registered.
    pub fn remove_observer(&self, id: ObserverId) -> bool {
        L::write(&self.state, |state| state.observers.remove(id))
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        L::read(&self.state, |state| state.observers.len())
    }

    /// Enable or disable anchor caching. Disabling drops all cached anchors.
    pub fn set_caching(&self, enabled: bool) {
        debug!(enabled, "position cache toggled");
        L::write(&self.indexer, |indexer| indexer.set_caching(enabled));
    }

    /// Whether the position indexer caches anchors.
    pub fn is_caching(&self) -> bool {
        L::read(&self.indexer, |indexer| indexer.is_caching())
    }

    /// Drop all cached anchors.
    pub fn clear_cache(&self) {
        L::write(&self.indexer, |indexer| indexer.clear_cache());
    }

    /// Number of currently cached anchors.
    pub fn cached_anchors(&self) -> usize {
        L::read(&self.indexer, |indexer| indexer.cached())
    }

    /// Run `f` against the text under the read lock.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&Text) -> R) -> R {
        L::read(&self.state, |state| f(&state.text))
    }

    /// Run `f` with an [`Edit`] handle under the exclusive lock.
    ///
    /// Edits made through the handle form one atomic batch: on a [`SyncBuffer`] no reader can
    /// observe the buffer between them. Each edit is still validated, indexed and broadcast to
    /// observers on its own, in order. The buffer itself must not be used inside `f`; go through
    /// the handle instead.
    ///
    /// ```rust
    /// use text_model::SyncBuffer;
    ///
    /// let buffer = SyncBuffer::from_text("let x = 1;");
    /// buffer
    ///     .edit(|edit| {
    ///         edit.delete((1, 4), (1, 5))?;
    ///         edit.insert((1, 4), "answer")
    ///     })
    ///     .unwrap();
    /// assert_eq!(buffer.to_string(), "let answer = 1;");
    /// ```
    pub fn edit<R>(&self, f: impl FnOnce(&mut Edit<'_, L>) -> R) -> R {
        L::write(&self.state, |state| {
            let mut edit = Edit {
                state,
                indexer: &self.indexer,
            };
            f(&mut edit)
        })
    }

    fn resolve_in(&self, text: &Text, at: Location, bound: Bound) -> Result<(usize, usize)> {
        resolve::<L>(text, &self.indexer, at, bound)
    }

    fn resolve_range_in(
        &self,
        text: &Text,
        start: Location,
        end: Location,
    ) -> Result<((usize, usize), (usize, usize))> {
        resolve_range::<L>(text, &self.indexer, start, end)
    }
}

/// Exclusive access to a buffer for a batch of mutations. Obtained from [`Buffer::edit`].
pub struct Edit<'a, L: Locking> {
    state: &'a mut State,
    indexer: &'a L::Cell<PositionIndexer>,
}

impl<L: Locking> Edit<'_, L> {
    pub(crate) fn text(&self) -> &Text {
        &self.state.text
    }

    /// Total length in characters.
    pub fn len(&self) -> usize {
        self.state.text.len()
    }

    /// Returns `true` if the buffer holds no characters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of lines.
    pub fn last_line(&self) -> usize {
        self.state.text.last_line()
    }

    /// Length of `line` in characters.
    pub fn line_len(&self, line: usize) -> Result<usize> {
        self.state.text.check_line(line)?;
        Ok(self.state.text.line_len(line))
    }

    /// Character at `at`, as [`Buffer::get`].
    pub fn get(&self, at: impl Into<Location>) -> Result<char> {
        let (line, column) = self.resolve(at.into(), Bound::Char)?;
        self.state.text.char_at(line, column)
    }

    /// Text between `start` and `end`, as [`Buffer::sub_sequence`].
    pub fn sub_sequence(
        &self,
        start: impl Into<Location>,
        end: impl Into<Location>,
    ) -> Result<String> {
        let (start, end) = self.resolve_range(start.into(), end.into())?;
        self.state.text.sub_sequence(start, end)
    }

    /// Insert `text` at `at`, as [`Buffer::insert`].
    pub fn insert(&mut self, at: impl Into<Location>, text: &str) -> Result<()> {
        let (line, column) = self.resolve(at.into(), Bound::Insert)?;
        self.insert_at(line, column, text)
    }

    /// Append `text` at the end of the buffer.
    pub fn append(&mut self, text: &str) {
        let line = self.state.text.last_line();
        let column = self.state.text.line_len(line);
        if let Err(err) = self.insert_at(line, column, text) {
            error!(%err, line, column, "append at the end of the buffer failed");
        }
    }

    /// Delete the text between `start` and `end`, as [`Buffer::delete`].
    pub fn delete(
        &mut self,
        start: impl Into<Location>,
        end: impl Into<Location>,
    ) -> Result<String> {
        let (start, end) = self.resolve_range(start.into(), end.into())?;
        if start == end {
            return Ok(String::new());
        }
        let change = self.state.text.delete(start, end)?;
        trace!(
            start_line = start.0,
            end_line = end.0,
            chars = change.char_len(),
            "delete"
        );
        self.broadcast_delete(&change);
        Ok(change.text)
    }

    /// Delete the character at `at`, as [`Buffer::delete_char_at`].
    pub fn delete_char_at(&mut self, at: impl Into<Location>) -> Result<char> {
        let (line, column) = self.resolve(at.into(), Bound::Char)?;
        let change = self.state.text.delete_char_at(line, column)?;
        trace!(line, column, merged = change.line_delta() > 0, "delete char");
        self.broadcast_delete(&change);
        change
            .text
            .chars()
            .next()
            .ok_or(TextError::Internal("single-character delete removed nothing"))
    }

    /// Remove all content, leaving one empty line.
    pub fn clear(&mut self) {
        if let Some(change) = self.state.text.clear() {
            trace!(chars = change.char_len(), "clear");
            self.broadcast_delete(&change);
        }
    }

    fn resolve(&self, at: Location, bound: Bound) -> Result<(usize, usize)> {
        resolve::<L>(&self.state.text, self.indexer, at, bound)
    }

    fn resolve_range(
        &self,
        start: Location,
        end: Location,
    ) -> Result<((usize, usize), (usize, usize))> {
        resolve_range::<L>(&self.state.text, self.indexer, start, end)
    }

    fn insert_at(&mut self, line: usize, column: usize, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let change = self.state.text.insert(line, column, text)?;
        trace!(
            line,
            column,
            end_line = change.end_line,
            chars = change.char_len(),
            "insert"
        );
        L::write(self.indexer, |indexer| {
            indexer.after_insert(&self.state.text, &change)
        });
        self.state.observers.notify(&change);
        Ok(())
    }

    fn broadcast_delete(&mut self, change: &TextChange) {
        L::write(self.indexer, |indexer| {
            indexer.after_delete(&self.state.text, change)
        });
        self.state.observers.notify(change);
    }
}

impl<L: Locking> fmt::Debug for Edit<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Edit")
            .field("len", &self.state.text.len())
            .field("lines", &self.state.text.last_line())
            .finish()
    }
}

/// Validate `at` against `bound` and turn it into `(line, column)`.
fn resolve<L: Locking>(
    text: &Text,
    indexer: &L::Cell<PositionIndexer>,
    at: Location,
    bound: Bound,
) -> Result<(usize, usize)> {
    match at {
        Location::LineColumn { line, column } => {
            text.check_line_column(line, column, bound)?;
            Ok((line, column))
        }
        Location::Index(index) => {
            text.check_index(index, bound)?;
            let position = L::write(indexer, |indexer| indexer.position_of(text, index))?;
            Ok((position.line, position.column))
        }
    }
}

/// Validate both ends of a range and check that they are ordered.
fn resolve_range<L: Locking>(
    text: &Text,
    indexer: &L::Cell<PositionIndexer>,
    start: Location,
    end: Location,
) -> Result<((usize, usize), (usize, usize))> {
    let start = resolve::<L>(text, indexer, start, Bound::Insert)?;
    let end = resolve::<L>(text, indexer, end, Bound::Insert)?;
    if start > end {
        let (start, end) = L::write(indexer, |indexer| {
            Ok::<_, TextError>((
                indexer.index_of(text, start.0, start.1)?,
                indexer.index_of(text, end.0, end.1)?,
            ))
        })?;
        return Err(TextError::InvalidRange { start, end });
    }
    Ok((start, end))
}

impl<L: Locking> Default for Buffer<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Locking> From<&str> for Buffer<L> {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl<L: Locking> fmt::Display for Buffer<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(LineTerminator::Lf))
    }
}

impl<L: Locking> fmt::Debug for Buffer<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        L::read(&self.state, |state| {
            f.debug_struct("Buffer")
                .field("thread_safe", &L::THREAD_SAFE)
                .field("len", &state.text.len())
                .field("lines", &state.text.last_line())
                .field("observers", &state.observers)
                .finish()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_new_buffer_has_one_empty_line() {
        let buffer = LocalBuffer::new();
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.last_line(), 1);
        assert_eq!(buffer.last_index(), None);
        assert_eq!(buffer.line_len(1).unwrap(), 0);
        assert_eq!(buffer.to_string(), "");
    }

    #[test]
    fn test_scenario_build() {
        let buffer = SyncBuffer::from_text("aa\nbcc\na");
        assert_eq!(buffer.len(), 8);
        assert_eq!(buffer.last_line(), 3);
        assert_eq!(buffer.row(1).unwrap(), "aa");
        assert_eq!(buffer.row(2).unwrap(), "bcc");
        assert_eq!(buffer.row(3).unwrap(), "a");
        assert_eq!(buffer.line_len(2).unwrap(), 3);
    }

    #[test]
    fn test_get_both_addressing_schemes() {
        let buffer = LocalBuffer::from_text("ab\ncd");
        assert_eq!(buffer.get(0).unwrap(), 'a');
        assert_eq!(buffer.get(2).unwrap(), '\n');
        assert_eq!(buffer.get(3).unwrap(), 'c');
        assert_eq!(buffer.get((1, 2)).unwrap(), '\n');
        assert_eq!(buffer.get((2, 1)).unwrap(), 'd');
        assert_eq!(
            buffer.get(5),
            Err(TextError::IndexOutOfRange { index: 5, bound: 5 })
        );
        assert_eq!(
            buffer.get((2, 2)),
            Err(TextError::ColumnOutOfRange {
                line: 2,
                column: 2,
                bound: 2
            })
        );
        assert_eq!(
            buffer.get((3, 0)),
            Err(TextError::LineOutOfRange {
                line: 3,
                last_line: 2
            })
        );
    }

    #[test]
    fn test_insert_by_index() {
        let buffer = LocalBuffer::from_text("hello\nworld");
        buffer.insert(6, "big ").unwrap();
        assert_eq!(buffer.to_string(), "hello\nbig world");
        buffer.insert(buffer.len(), "!").unwrap();
        assert_eq!(buffer.to_string(), "hello\nbig world!");
        assert!(buffer.insert(buffer.len() + 1, "x").is_err());
    }

    #[test]
    fn test_delete_returns_removed_text() {
        let buffer = LocalBuffer::from_text("aa\nbcc\na");
        assert_eq!(buffer.delete((2, 1), (3, 1)).unwrap(), "cc\na");
        assert_eq!(buffer.to_string(), "aa\nb");
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.last_line(), 2);
        assert_eq!(buffer.delete(1, 1).unwrap(), "");
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let buffer = LocalBuffer::from_text("abc\ndef");
        assert_eq!(
            buffer.delete((2, 1), (1, 1)),
            Err(TextError::InvalidRange { start: 5, end: 1 })
        );
        assert_eq!(
            buffer.sub_sequence(3, 1),
            Err(TextError::InvalidRange { start: 3, end: 1 })
        );
        assert_eq!(buffer.to_string(), "abc\ndef");
    }

    #[test]
    fn test_delete_char_at_joins_lines() {
        let buffer = LocalBuffer::from_text("ab\ncd\nef");
        assert_eq!(buffer.delete_char_at((1, 2)).unwrap(), '\n');
        assert_eq!(buffer.last_line(), 2);
        assert_eq!(buffer.to_string(), "abcd\nef");
        assert_eq!(buffer.delete_char_at(0).unwrap(), 'a');
        assert!(buffer.delete_char_at((2, 2)).is_err());
    }

    #[test]
    fn test_observers_see_every_change() {
        let buffer = SyncBuffer::new();
        let log: Arc<Mutex<Vec<TextChange>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let id = buffer.subscribe(move |change| sink.lock().expect("lock").push(change.clone()));

        buffer.append("ab\ncd");
        buffer.delete_char_at((1, 2)).unwrap();
        assert!(buffer.remove_observer(id));
        buffer.append("ignored");

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0], TextChange::insert((1, 0), (2, 2), "ab\ncd".into()));
        assert_eq!(log[1], TextChange::delete((1, 2), (2, 0), "\n".into()));
        assert_eq!(buffer.observer_count(), 0);
    }

    #[test]
    fn test_clear_notifies_and_resets() {
        let buffer = LocalBuffer::from_text("x\ny\nz");
        let removed = Arc::new(Mutex::new(String::new()));
        let sink = removed.clone();
        buffer.subscribe(move |change| sink.lock().expect("lock").push_str(&change.text));
        buffer.clear();
        assert_eq!(*removed.lock().unwrap(), "x\ny\nz");
        assert_eq!(buffer.last_line(), 1);
        assert!(buffer.is_empty());
        assert_eq!(buffer.position_of(0).unwrap(), Position::zero());
    }

    #[test]
    fn test_into_locking_keeps_content() {
        let local = LocalBuffer::from_text("one\ntwo");
        local.subscribe(|_| {});
        let shared: SyncBuffer = local.into_locking();
        assert!(shared.is_thread_safe());
        assert_eq!(shared.to_string(), "one\ntwo");
        assert_eq!(shared.observer_count(), 1);
    }

    #[test]
    fn test_edit_batch_replaces_selection() {
        let buffer = LocalBuffer::from_text("hello world");
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        buffer.subscribe(move |change| sink.lock().expect("lock").push(change.kind));

        let removed = buffer
            .edit(|edit| {
                let removed = edit.delete((1, 6), (1, 11))?;
                edit.insert(6, "there")?;
                assert_eq!(edit.get(6)?, 't');
                assert_eq!(edit.len(), 11);
                Ok::<_, TextError>(removed)
            })
            .unwrap();

        assert_eq!(removed, "world");
        assert_eq!(buffer.to_string(), "hello there");
        assert_eq!(
            *log.lock().unwrap(),
            vec![crate::ChangeKind::Delete, crate::ChangeKind::Insert]
        );
    }

    #[test]
    fn test_edit_batch_stops_at_first_error() {
        let buffer = LocalBuffer::from_text("ab\ncd");
        let result = buffer.edit(|edit| {
            edit.append("e");
            edit.insert((3, 0), "x")
        });

        assert_eq!(
            result,
            Err(TextError::LineOutOfRange {
                line: 3,
                last_line: 2
            })
        );
        assert_eq!(buffer.to_string(), "ab\ncde");
        assert_eq!(buffer.index_of(2, 3).unwrap(), 6);
    }

    #[test]
    fn test_capacity_grows_with_content() {
        let buffer = LocalBuffer::new();
        assert_eq!(buffer.capacity(), Row::DEFAULT_CAPACITY);
        buffer.append("\n\n");
        assert_eq!(buffer.capacity(), Row::DEFAULT_CAPACITY * 3);
    }
}
