//! Memoizing cache over a fallible single-pass source
//!
//! [`TryMemoized`] is the [`Memoized`](super::Memoized) contract for
//! sources that yield `Result<T, E>`. Successful items are cached
//! exactly like the infallible cache; a source error is *not* cached
//! and does *not* exhaust the cache — it propagates to whichever
//! caller triggered the pull, tagged with the failed position, and the
//! source stays in place so the position may be retried. Failure and
//! exhaustion are distinct, permanent only for the latter.

use std::cell::RefCell;
use std::fmt;

use tracing::{debug, trace};

use super::MAX_CACHED;
use crate::error::SourceError;

/// A memoizing cache over an iterator of `Result<T, E>`.
///
/// The store holds only the `T`s; errors pass through uncached.
///
/// ```
/// use memoseq::TryMemoized;
///
/// let source: Vec<Result<u32, String>> =
///     vec![Ok(1), Ok(2), Err("flaky read".into()), Ok(3)];
/// let memo = TryMemoized::new(source);
///
/// assert_eq!(memo.get(1).unwrap(), Some(2));
/// let err = memo.get(2).unwrap_err();
/// assert_eq!(err.index, 2);
///
/// // The failure did not exhaust the source; a retry pulls its next
/// // item into the failed position.
/// assert!(!memo.is_exhausted());
/// assert_eq!(memo.get(2).unwrap(), Some(3));
/// ```
pub struct TryMemoized<I, T> {
    inner: RefCell<TryInner<I, T>>,
}

struct TryInner<I, T> {
    source: Option<I>,
    cached: Vec<T>,
}

impl<I, T, E> TryInner<I, T>
where
    I: Iterator<Item = Result<T, E>>,
{
    /// Advance the source by one step, caching on success only.
    ///
    /// On `Err`, the source handle is left in place: whether a retry
    /// can succeed is the source's business, not the cache's.
    fn pull_one(&mut self) -> Result<Option<&T>, SourceError<E>> {
        let Some(source) = self.source.as_mut() else {
            return Ok(None);
        };
        match source.next() {
            Some(Ok(item)) => {
                trace!("cached item {}", self.cached.len());
                self.cached.push(item);
                Ok(self.cached.last())
            }
            Some(Err(source)) => {
                debug!("source failed at position {}", self.cached.len());
                Err(SourceError {
                    index: self.cached.len(),
                    source,
                })
            }
            None => {
                debug!("source exhausted after {} items", self.cached.len());
                self.source = None;
                Ok(None)
            }
        }
    }

    fn ensure(&mut self, index: usize) -> Result<bool, SourceError<E>> {
        if index >= MAX_CACHED {
            debug!("index {} is beyond MAX_CACHED, refusing", index);
            return Ok(false);
        }
        while self.cached.len() <= index {
            if self.pull_one()?.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl<I, T, E> TryMemoized<I, T>
where
    I: Iterator<Item = Result<T, E>>,
{
    /// Create a cache over a fallible `source`. Nothing is pulled
    /// until demanded.
    pub fn new<S>(source: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            inner: RefCell::new(TryInner {
                source: Some(source.into_iter()),
                cached: Vec::new(),
            }),
        }
    }

    /// True if `index` is already in the store. Never pulls.
    pub fn has_cached(&self, index: usize) -> bool {
        index < self.inner.borrow().cached.len() && index < MAX_CACHED
    }

    /// Pull until the store covers `index`, the source runs out, or it
    /// fails. `Ok(covered)` on the first two; the error on the third.
    pub fn try_ensure(&self, index: usize) -> Result<bool, SourceError<E>> {
        self.inner.borrow_mut().ensure(index)
    }

    /// The item at `index`, pulling as needed.
    ///
    /// `Ok(None)` means the source ran out before `index` — absence is
    /// not an error. `Err` carries a source failure.
    pub fn get(&self, index: usize) -> Result<Option<T>, SourceError<E>>
    where
        T: Clone,
    {
        let mut inner = self.inner.borrow_mut();
        Ok(inner.ensure(index)?.then(|| inner.cached[index].clone()))
    }

    /// Like [`get`](Self::get), but hands a borrow of the item to
    /// `out` instead of cloning. `Ok(called)` reports whether it ran.
    pub fn try_get(
        &self,
        index: usize,
        out: impl FnOnce(&T),
    ) -> Result<bool, SourceError<E>> {
        let mut inner = self.inner.borrow_mut();
        if inner.ensure(index)? {
            out(&inner.cached[index]);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Pull exactly one item into the store. `Ok(true)` if a new item
    /// was cached, `Ok(false)` on exhaustion (safe to repeat).
    pub fn advance(&self) -> Result<bool, SourceError<E>> {
        Ok(self.inner.borrow_mut().pull_one()?.is_some())
    }

    /// Number of items cached so far.
    pub fn len(&self) -> usize {
        self.inner.borrow().cached.len()
    }

    /// True if nothing has been pulled yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once the source has reported exhaustion. A source failure
    /// does not set this.
    pub fn is_exhausted(&self) -> bool {
        self.inner.borrow().source.is_none()
    }

    /// Mint an independent traversal cursor starting at position 0.
    pub fn cursor(&self) -> TryCursor<'_, I, T> {
        TryCursor {
            cache: self,
            pos: 0,
            done: false,
        }
    }
}

impl<I, T> fmt::Debug for TryMemoized<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("TryMemoized")
            .field("cached", &inner.cached.len())
            .field("exhausted", &inner.source.is_none())
            .finish()
    }
}

/// An independently-positioned traversal over a [`TryMemoized`] cache.
///
/// Yields `Ok` items from the shared store, pulling when it outruns
/// it. A source error is yielded as `Err` *without* advancing the
/// cursor: the next call retries the same position. Only exhaustion
/// ends the traversal.
pub struct TryCursor<'a, I, T> {
    cache: &'a TryMemoized<I, T>,
    pos: usize,
    done: bool,
}

impl<I, T> TryCursor<'_, I, T> {
    /// Position of the next item this cursor will yield.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<I, T, E> Iterator for TryCursor<'_, I, T>
where
    I: Iterator<Item = Result<T, E>>,
    T: Clone,
{
    type Item = Result<T, SourceError<E>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut inner = self.cache.inner.borrow_mut();
        if self.pos < inner.cached.len() {
            let item = inner.cached[self.pos].clone();
            self.pos += 1;
            return Some(Ok(item));
        }
        match inner.pull_one() {
            Ok(Some(item)) => {
                let item = item.clone();
                self.pos += 1;
                Some(Ok(item))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => Some(Err(err)),
        }
    }
}
