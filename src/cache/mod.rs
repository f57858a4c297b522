//! Memoizing cache over a single-pass source
//!
//! [`Memoized`] owns a one-shot iterator and an append-only store of
//! everything it has produced so far. Pulling is strictly demand
//! driven: a positional query or an advancing cursor pulls the source
//! just far enough, each produced item is recorded exactly once, and
//! every consumer reads from the shared store after that.
//!
//! # Sharing model
//!
//! The cache is single-threaded cooperative: state lives behind a
//! `RefCell`, so the type is `!Sync` and any number of cursors and
//! positional queries may interleave on one thread. There is no
//! re-entrancy protection — a source that calls back into its own
//! cache while producing will hit the `RefCell` borrow panic.

pub mod cursor;
pub mod fallible;

use std::cell::RefCell;
use std::fmt;

use tracing::{debug, trace};

use crate::cache::cursor::Cursor;

/// Upper bound on cachable indices, equal to `u32::MAX`.
///
/// Any index at or beyond this bound is structurally uncachable: every
/// operation reports absence for it without consulting the source.
/// This is an external contract, not an implementation detail.
pub const MAX_CACHED: usize = u32::MAX as usize;

/// A memoizing cache over a single-pass iterator.
///
/// Created with [`memoize`] or [`Memoized::new`] from anything
/// iterable. The source is polled lazily and at most once per logical
/// position; exhaustion is permanent.
pub struct Memoized<I: Iterator> {
    inner: RefCell<Inner<I>>,
}

struct Inner<I: Iterator> {
    /// Set to `None` permanently once the source reports exhaustion.
    source: Option<I>,
    /// Append-only prefix of the source's output, in production order.
    cached: Vec<I::Item>,
}

impl<I: Iterator> Inner<I> {
    /// Advance the source by exactly one step.
    ///
    /// The sole append site for `cached` and the sole reader of
    /// `source`. A no-op returning `None` once the source is gone.
    fn pull_one(&mut self) -> Option<&I::Item> {
        let source = self.source.as_mut()?;
        match source.next() {
            Some(item) => {
                trace!("cached item {}", self.cached.len());
                self.cached.push(item);
                self.cached.last()
            }
            None => {
                debug!("source exhausted after {} items", self.cached.len());
                self.source = None;
                None
            }
        }
    }

    fn ensure(&mut self, index: usize) -> bool {
        if index >= MAX_CACHED {
            debug!("index {} is beyond MAX_CACHED, refusing", index);
            return false;
        }
        while self.cached.len() <= index {
            if self.pull_one().is_none() {
                return false;
            }
        }
        true
    }
}

impl<I: Iterator> Memoized<I> {
    /// Create a cache over `source`. Nothing is pulled until demanded.
    pub fn new<S>(source: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            inner: RefCell::new(Inner {
                source: Some(source.into_iter()),
                cached: Vec::new(),
            }),
        }
    }

    /// True if `index` is already in the store. Never pulls.
    pub fn has_cached(&self, index: usize) -> bool {
        index < self.inner.borrow().cached.len() && index < MAX_CACHED
    }

    /// Pull until the store covers `index` or the source runs out.
    ///
    /// Returns whether `index` is covered on return. Indices at or
    /// beyond [`MAX_CACHED`] fail fast without touching the source.
    pub fn ensure(&self, index: usize) -> bool {
        self.inner.borrow_mut().ensure(index)
    }

    /// The item at `index`, pulling as needed.
    ///
    /// `None` means the source ran out before reaching `index` (or the
    /// index is beyond [`MAX_CACHED`]) — a normal outcome, not an
    /// error. For item types that are not `Clone`, use
    /// [`try_get`](Self::try_get).
    pub fn get(&self, index: usize) -> Option<I::Item>
    where
        I::Item: Clone,
    {
        let mut inner = self.inner.borrow_mut();
        if inner.ensure(index) {
            Some(inner.cached[index].clone())
        } else {
            None
        }
    }

    /// Like [`get`](Self::get), but hands a borrow of the item to
    /// `out` instead of cloning. Returns whether `out` was called.
    pub fn try_get(&self, index: usize, out: impl FnOnce(&I::Item)) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.ensure(index) {
            out(&inner.cached[index]);
            true
        } else {
            false
        }
    }

    /// Pull exactly one item from the source into the store.
    ///
    /// Returns `true` if a new item was cached, `false` if the source
    /// is (now or already) exhausted. Safe to call forever after
    /// exhaustion. Exposed so callers can drive production manually;
    /// the newly cached item is at `len() - 1`.
    pub fn advance(&self) -> bool {
        self.inner.borrow_mut().pull_one().is_some()
    }

    /// Number of items cached so far.
    pub fn len(&self) -> usize {
        self.inner.borrow().cached.len()
    }

    /// True if nothing has been pulled yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once the source has reported exhaustion. Permanent.
    pub fn is_exhausted(&self) -> bool {
        self.inner.borrow().source.is_none()
    }

    /// Mint an independent traversal cursor starting at position 0.
    ///
    /// Repeatable at any time; any number of simultaneous cursors may
    /// interleave, all reading from (and populating) the same store.
    pub fn cursor(&self) -> Cursor<'_, I> {
        Cursor::new(self)
    }
}

impl<I: Iterator> fmt::Debug for Memoized<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Memoized")
            .field("cached", &inner.cached.len())
            .field("exhausted", &inner.source.is_none())
            .finish()
    }
}

impl<'a, I: Iterator> IntoIterator for &'a Memoized<I>
where
    I::Item: Clone,
{
    type Item = I::Item;
    type IntoIter = Cursor<'a, I>;

    fn into_iter(self) -> Cursor<'a, I> {
        self.cursor()
    }
}

/// Shorthand for [`Memoized::new`].
pub fn memoize<S>(source: S) -> Memoized<S::IntoIter>
where
    S: IntoIterator,
{
    Memoized::new(source)
}
