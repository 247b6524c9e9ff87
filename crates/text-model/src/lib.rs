#![warn(missing_docs)]
//! Text Model - Line-Addressable Character Buffer for Code Editors
//!
//! # Overview
//!
//! `text-model` stores a document as an ordered sequence of rows of characters and answers two
//! questions fast: "what is at this position?" and "where is this position?". It does not parse,
//! highlight or render anything; it is the storage layer underneath those.
//!
//! # Core Features
//!
//! - **Row Storage**: one growable character buffer per line, edits cost O(line length)
//! - **Two Addressing Schemes**: flat character index or 1-based line plus 0-based column
//! - **Position Index**: bounded LRU cache of anchors, lookups walk from the nearest anchor
//! - **Change Notifications**: observers see every insert and delete with its exact span
//! - **Batched Edits**: several edits applied under one lock acquisition
//! - **Optional Locking**: reader/writer locked or lock-free, chosen by type parameter
//! - **Stream I/O**: line-oriented load/save with a cancellable progress probe
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Stream Worker (load / save / copy)         │  ← Boundary
//! ├─────────────────────────────────────────────┤
//! │  Buffer + Iterators + Observers             │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Position Indexer (anchor cache)            │  ← Coordinate Mapping
//! ├─────────────────────────────────────────────┤
//! │  Row Sequence                               │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use text_model::{LocalBuffer, Position};
//!
//! let buffer = LocalBuffer::from_text("fn main() {\n}\n");
//! buffer.insert((1, 11), "\n    println!(\"hi\");").unwrap();
//!
//! assert_eq!(buffer.last_line(), 4);
//! assert_eq!(buffer.position_of(12).unwrap(), Position::new(2, 0, 12));
//! assert_eq!(buffer.index_of(3, 0).unwrap(), 32);
//! ```
//!
//! ## Observing Changes
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use text_model::SyncBuffer;
//!
//! let buffer = SyncBuffer::new();
//! let lines_added = Arc::new(Mutex::new(0));
//! let counter = lines_added.clone();
//! buffer.subscribe(move |change| *counter.lock().unwrap() += change.line_delta());
//!
//! buffer.append("a\nb\nc");
//! assert_eq!(*lines_added.lock().unwrap(), 2);
//! ```
//!
//! # Module Description
//!
//! - [`row`] - Single-line character storage
//! - [`buffer`] - The row sequence, validation and mutation API
//! - [`indexer`] - Index ↔ line/column mapping with an anchor cache
//! - [`change`] - Change events and observers
//! - [`iter`] - Character and row iterators
//! - [`worker`] - Line-oriented stream load/save
//! - [`sync`] - Locking strategies
//!
//! # Coordinates
//!
//! Every row boundary is one virtual `'\n'` character. A buffer holding `"ab\ncd"` has length 5,
//! index 2 is line 1 column 2, and index 3 is line 2 column 0. Input may use LF, CR or CRLF;
//! each collapses into a single boundary.

pub mod buffer;
pub mod change;
mod error;
pub mod indexer;
pub mod iter;
pub mod line_ending;
mod position;
pub mod row;
pub mod sync;
mod text;
pub mod worker;

pub use buffer::{Buffer, BufferOptions, Edit, LocalBuffer, SyncBuffer};
pub use change::{BufferObserver, ChangeKind, ObserverId, TextChange};
pub use error::{Result, TextError, WorkerError};
pub use indexer::DEFAULT_CACHE_CAPACITY;
pub use iter::{Chars, Rows};
pub use line_ending::LineTerminator;
pub use position::{Location, Position};
pub use row::Row;
pub use sync::{Locked, Locking, Unlocked};
pub use worker::Outcome;
