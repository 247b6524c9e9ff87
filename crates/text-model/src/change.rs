//! Mutation events.
//!
//! Every mutation of a [`Buffer`](crate::Buffer) is described by one [`TextChange`]: the affected
//! span in line/column coordinates plus the exact text that was inserted or removed. Incremental
//! consumers (undo stacks, highlighters, the position indexer) register a [`BufferObserver`] and
//! are called synchronously, in registration order, before the mutating call returns.

use std::fmt;

/// Whether a change added or removed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Text was inserted.
    Insert,
    /// Text was deleted.
    Delete,
}

/// A single applied edit.
///
/// Semantics:
/// - For an insert, `start` is where the text went in and `end` is where it ends in the
///   post-edit document.
/// - For a delete, `start..end` is the removed span in the pre-edit document.
/// - `text` uses `'\n'` for every line boundary, so `char_len()` always equals the change in
///   buffer length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    /// Insert or delete.
    pub kind: ChangeKind,
    /// 1-based start line.
    pub start_line: usize,
    /// 0-based start column.
    pub start_column: usize,
    /// 1-based end line.
    pub end_line: usize,
    /// 0-based end column.
    pub end_column: usize,
    /// Exact inserted or deleted text.
    pub text: String,
}

impl TextChange {
    pub(crate) fn insert(
        (start_line, start_column): (usize, usize),
        (end_line, end_column): (usize, usize),
        text: String,
    ) -> Self {
        Self {
            kind: ChangeKind::Insert,
            start_line,
            start_column,
            end_line,
            end_column,
            text,
        }
    }

    pub(crate) fn delete(
        (start_line, start_column): (usize, usize),
        (end_line, end_column): (usize, usize),
        text: String,
    ) -> Self {
        Self {
            kind: ChangeKind::Delete,
            start_line,
            start_column,
            end_line,
            end_column,
            text,
        }
    }

    /// Length of `text` in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Number of line boundaries spanned (`end_line - start_line`).
    pub fn line_delta(&self) -> usize {
        self.end_line - self.start_line
    }

    /// `(line, column)` of the start.
    pub fn start(&self) -> (usize, usize) {
        (self.start_line, self.start_column)
    }

    /// `(line, column)` of the end.
    pub fn end(&self) -> (usize, usize) {
        (self.end_line, self.end_column)
    }
}

/// A listener notified after every buffer mutation.
///
/// Observers run while the buffer's exclusive lock is held and must not call back into the
/// buffer that is notifying them.
pub trait BufferObserver: Send + Sync {
    /// Called after text has been inserted.
    fn after_insert(&mut self, change: &TextChange);

    /// Called after text has been deleted.
    fn after_delete(&mut self, change: &TextChange);
}

/// Adapter that lets a closure observe both kinds of change.
pub(crate) struct FnObserver<F>(pub(crate) F);

impl<F> BufferObserver for FnObserver<F>
where
    F: FnMut(&TextChange) + Send + Sync,
{
    fn after_insert(&mut self, change: &TextChange) {
        (self.0)(change)
    }

    fn after_delete(&mut self, change: &TextChange) {
        (self.0)(change)
    }
}

/// Handle returned when an observer is registered; used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// Owned, ordered observer registry.
#[derive(Default)]
pub(crate) struct ObserverList {
    next_id: u64,
    entries: Vec<(ObserverId, Box<dyn BufferObserver>)>,
}

impl ObserverList {
    pub(crate) fn add(&mut self, observer: Box<dyn BufferObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn notify(&mut self, change: &TextChange) {
        for (_, observer) in &mut self.entries {
            match change.kind {
                ChangeKind::Insert => observer.after_insert(change),
                ChangeKind::Delete => observer.after_delete(change),
            }
        }
    }
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("len", &self.entries.len())
            .finish()
    }
}
