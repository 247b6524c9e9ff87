//! Locking strategies.
//!
//! A buffer picks its strategy through a type parameter. Both strategies expose the same scoped
//! acquisition (`read` / `write` taking a closure), so buffer code is written once:
//!
//! - [`Locked`] wraps state in an [`RwLock`]: reads share, mutations are exclusive, and the buffer
//!   is `Sync` so it can be shared across threads behind an `Arc`.
//! - [`Unlocked`] wraps state in a [`RefCell`]: no atomic operations at all, and the buffer is not
//!   `Sync`, so the compiler enforces that a single thread drives it.

use std::cell::RefCell;
use std::sync::{PoisonError, RwLock};

mod private {
    pub trait Sealed {}
    impl Sealed for super::Locked {}
    impl Sealed for super::Unlocked {}
}

/// Scoped acquisition over a piece of guarded state.
pub trait Locking: private::Sealed + Sized + 'static {
    /// Container that guards a `T`.
    type Cell<T>;

    /// Whether this strategy can be shared across threads.
    const THREAD_SAFE: bool;

    /// Guard a value.
    fn new_cell<T>(value: T) -> Self::Cell<T>;

    /// Run `f` with shared access.
    fn read<T, R>(cell: &Self::Cell<T>, f: impl FnOnce(&T) -> R) -> R;

    /// Run `f` with exclusive access.
    fn write<T, R>(cell: &Self::Cell<T>, f: impl FnOnce(&mut T) -> R) -> R;

    /// Unwrap the guarded value.
    fn into_inner<T>(cell: Self::Cell<T>) -> T;
}

/// Reader/writer locking. Mutations are fully linearized, reads run in parallel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Locked;

/// No locking. The caller serializes access by owning the buffer on one thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlocked;

// Every mutation validates before it writes, so state behind a poisoned lock is still
// consistent and is recovered rather than propagated.
impl Locking for Locked {
    type Cell<T> = RwLock<T>;

    const THREAD_SAFE: bool = true;

    fn new_cell<T>(value: T) -> RwLock<T> {
        RwLock::new(value)
    }

    fn read<T, R>(cell: &RwLock<T>, f: impl FnOnce(&T) -> R) -> R {
        let guard = cell.read().unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }

    fn write<T, R>(cell: &RwLock<T>, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = cell.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }

    fn into_inner<T>(cell: RwLock<T>) -> T {
        cell.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Locking for Unlocked {
    type Cell<T> = RefCell<T>;

    const THREAD_SAFE: bool = false;

    fn new_cell<T>(value: T) -> RefCell<T> {
        RefCell::new(value)
    }

    fn read<T, R>(cell: &RefCell<T>, f: impl FnOnce(&T) -> R) -> R {
        f(&*cell.borrow())
    }

    fn write<T, R>(cell: &RefCell<T>, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut *cell.borrow_mut())
    }

    fn into_inner<T>(cell: RefCell<T>) -> T {
        cell.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bump<L: Locking>() -> usize {
        let cell = L::new_cell(1usize);
        L::write(&cell, |value| *value += 1);
        let seen = L::read(&cell, |value| *value);
        seen + L::into_inner(cell)
    }

    #[test]
    fn test_strategies_behave_alike() {
        assert_eq!(bump::<Locked>(), 4);
        assert_eq!(bump::<Unlocked>(), 4);
        assert!(Locked::THREAD_SAFE);
        assert!(!Unlocked::THREAD_SAFE);
    }
}
