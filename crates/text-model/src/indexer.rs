//! Position indexer: (line, column) ⇄ flat index without rescanning the document.
//!
//! Editing sessions have strong spatial locality: the cursor, the last edit, and the next query
//! are usually a few lines apart. The indexer keeps a small, recency-ordered cache of previously
//! resolved positions ("anchors") plus one exact anchor at the end of the buffer. A lookup starts
//! from the nearest anchor and walks line by line, so its cost is the distance to that anchor
//! instead of the distance from the top of the document.
//!
//! The buffer keeps the cache coherent by shifting or evicting anchors inside the same critical
//! section as every mutation. Caching only changes cost: results are identical with a
//! cold, warm or disabled cache.

use crate::change::TextChange;
use crate::error::{Result, TextError};
use crate::position::Position;
use crate::text::Text;
use std::collections::VecDeque;
use tracing::{error, trace};

/// Default number of cached anchors.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

#[derive(Debug)]
pub(crate) struct PositionIndexer {
    /// Most recently used first. Evicted from the back.
    cache: VecDeque<Position>,
    capacity: usize,
    caching: bool,
    /// Always exact: last line, its length, and the buffer length.
    end: Position,
}

/// Where a lookup starts from.
struct Nearest {
    anchor: Position,
    /// Slot in the cache, if the anchor came from there.
    slot: Option<usize>,
}

impl PositionIndexer {
    pub(crate) fn new(capacity: usize, caching: bool) -> Self {
        Self {
            cache: VecDeque::with_capacity(capacity + 1),
            capacity,
            caching,
            end: Position::zero(),
        }
    }

    pub(crate) fn cached(&self) -> usize {
        self.cache.len()
    }

    pub(crate) fn is_caching(&self) -> bool {
        self.caching
    }

    pub(crate) fn set_caching(&mut self, enabled: bool) {
        self.caching = enabled;
        if !enabled {
            self.cache.clear();
        }
    }

    pub(crate) fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Recompute the end anchor from the current text. O(1).
    pub(crate) fn refresh_end(&mut self, text: &Text) {
        let last_line = text.last_line();
        self.end = Position::new(last_line, text.line_len(last_line), text.len());
    }

    /// Flat index of a validated `(line, column)`.
    pub(crate) fn index_of(&mut self, text: &Text, line: usize, column: usize) -> Result<usize> {
        Ok(self.resolve_line_column(text, line, column)?.index)
    }

    /// Resolve a validated `(line, column)` to a full position.
    pub(crate) fn resolve_line_column(
        &mut self,
        text: &Text,
        line: usize,
        column: usize,
    ) -> Result<Position> {
        let Nearest { anchor, slot } = self.nearest_by_line(line, column);
        if anchor.line == line && anchor.column == column {
            return Ok(anchor);
        }
        if let Some(slot) = slot {
            self.promote(slot);
        }

        let mut work_line = anchor.line;
        let mut line_start = anchor.line_start();
        while work_line < line {
            line_start += text.line_len(work_line) + 1;
            work_line += 1;
        }
        while work_line > line {
            if work_line == 1 {
                return Err(fault("backward line walk passed line 1"));
            }
            work_line -= 1;
            line_start = line_start
                .checked_sub(text.line_len(work_line) + 1)
                .ok_or_else(|| fault("backward line walk passed index 0"))?;
        }
        trace!(
            from_line = anchor.line,
            to_line = line,
            "resolved line/column via anchor"
        );

        let position = Position::new(line, column, line_start + column);
        self.push(position);
        Ok(position)
    }

    /// Resolve a validated flat index to a full position.
    pub(crate) fn position_of(&mut self, text: &Text, index: usize) -> Result<Position> {
        let Nearest { anchor, slot } = self.nearest_by_index(index);
        if anchor.index == index {
            return Ok(anchor);
        }
        if let Some(slot) = slot {
            self.promote(slot);
        }

        let mut line = anchor.line;
        let mut line_start = anchor.line_start();
        if index > anchor.index {
            while index > line_start + text.line_len(line) {
                line_start += text.line_len(line) + 1;
                line += 1;
                if line > text.last_line() {
                    return Err(fault("forward index walk passed the last line"));
                }
            }
        } else {
            while index < line_start {
                if line == 1 {
                    return Err(fault("backward index walk passed line 1"));
                }
                line -= 1;
                line_start = line_start
                    .checked_sub(text.line_len(line) + 1)
                    .ok_or_else(|| fault("backward index walk passed index 0"))?;
            }
        }
        trace!(from = anchor.index, to = index, "resolved index via anchor");

        let position = Position::new(line, index - line_start, index);
        self.push(position);
        Ok(position)
    }

    /// Shift anchors at or after the insertion point.
    pub(crate) fn after_insert(&mut self, text: &Text, change: &TextChange) {
        let inserted = change.char_len();
        let line_delta = change.line_delta();
        for anchor in &mut self.cache {
            if anchor.line == change.start_line && anchor.column >= change.start_column {
                anchor.line += line_delta;
                anchor.column = change.end_column + (anchor.column - change.start_column);
                anchor.index += inserted;
            } else if anchor.line > change.start_line {
                anchor.line += line_delta;
                anchor.index += inserted;
            }
        }
        self.refresh_end(text);
    }

    /// Evict anchors inside the deleted span and shift the ones after it.
    pub(crate) fn after_delete(&mut self, text: &Text, change: &TextChange) {
        let removed = change.char_len();
        let line_delta = change.line_delta();
        let (start, end) = (change.start(), change.end());
        self.cache.retain(|anchor| {
            let at = (anchor.line, anchor.column);
            !(start <= at && at < end)
        });
        for anchor in &mut self.cache {
            if (anchor.line, anchor.column) >= end {
                if anchor.line == change.end_line {
                    anchor.column = change.start_column + (anchor.column - change.end_column);
                }
                anchor.line -= line_delta;
                anchor.index -= removed;
            }
        }
        self.refresh_end(text);
    }

    /// Nearest anchor by line. An anchor at exactly `(line, column)` always wins, so a repeated
    /// lookup never caches a second copy of the same position.
    fn nearest_by_line(&self, line: usize, column: usize) -> Nearest {
        let exact = |anchor: &Position| anchor.line == line && anchor.column == column;
        if exact(&self.end) {
            return Nearest {
                anchor: self.end,
                slot: None,
            };
        }
        let mut nearest = Nearest {
            anchor: Position::zero(),
            slot: None,
        };
        let mut distance = line - 1;
        for (slot, anchor) in self.cache.iter().enumerate() {
            if exact(anchor) {
                return Nearest {
                    anchor: *anchor,
                    slot: Some(slot),
                };
            }
            let d = anchor.line.abs_diff(line);
            if d < distance {
                distance = d;
                nearest = Nearest {
                    anchor: *anchor,
                    slot: Some(slot),
                };
            }
        }
        if self.end.line.abs_diff(line) < distance {
            nearest = Nearest {
                anchor: self.end,
                slot: None,
            };
        }
        nearest
    }

    fn nearest_by_index(&self, index: usize) -> Nearest {
        let mut nearest = Nearest {
            anchor: Position::zero(),
            slot: None,
        };
        let mut distance = index;
        for (slot, anchor) in self.cache.iter().enumerate() {
            let d = anchor.index.abs_diff(index);
            if d < distance {
                distance = d;
                nearest = Nearest {
                    anchor: *anchor,
                    slot: Some(slot),
                };
            }
        }
        if self.end.index.abs_diff(index) < distance {
            nearest = Nearest {
                anchor: self.end,
                slot: None,
            };
        }
        nearest
    }

    fn promote(&mut self, slot: usize) {
        if slot > 0
            && let Some(anchor) = self.cache.remove(slot)
        {
            self.cache.push_front(anchor);
        }
    }

    fn push(&mut self, position: Position) {
        if !self.caching || self.capacity == 0 {
            return;
        }
        self.cache.push_front(position);
        self.cache.truncate(self.capacity);
    }

    #[cfg(test)]
    fn anchors(&self) -> Vec<Position> {
        self.cache.iter().copied().collect()
    }
}

fn fault(detail: &'static str) -> TextError {
    error!(detail, "position index is inconsistent with the buffer");
    TextError::Internal(detail)
}
