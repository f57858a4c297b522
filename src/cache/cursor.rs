//! Replay cursors over a shared memoizing cache

use std::iter::FusedIterator;

use super::Memoized;

/// An independently-positioned traversal over a [`Memoized`] cache.
///
/// A cursor owns nothing but its position: every step re-reads the
/// live store, so items cached by other cursors or by positional
/// queries are picked up for free, and a step that outruns the store
/// pulls the source once on behalf of every consumer.
///
/// Ends permanently once it observes exhaustion (the iterator is
/// fused).
pub struct Cursor<'a, I: Iterator> {
    cache: &'a Memoized<I>,
    pos: usize,
    done: bool,
}

impl<'a, I: Iterator> Cursor<'a, I> {
    pub(super) fn new(cache: &'a Memoized<I>) -> Self {
        Self {
            cache,
            pos: 0,
            done: false,
        }
    }

    /// Position of the next item this cursor will yield.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<I: Iterator> Iterator for Cursor<'_, I>
where
    I::Item: Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.done {
            return None;
        }
        let mut inner = self.cache.inner.borrow_mut();
        // Re-check the live store length on every step: another cursor
        // or a positional query may have pulled since our last call.
        if self.pos < inner.cached.len() {
            let item = inner.cached[self.pos].clone();
            self.pos += 1;
            return Some(item);
        }
        match inner.pull_one() {
            Some(item) => {
                let item = item.clone();
                self.pos += 1;
                Some(item)
            }
            None => {
                self.done = true;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let inner = self.cache.inner.borrow();
        let remaining = inner.cached.len().saturating_sub(self.pos);
        if inner.source.is_none() {
            (remaining, Some(remaining))
        } else {
            (remaining, None)
        }
    }
}

impl<I: Iterator> FusedIterator for Cursor<'_, I> where I::Item: Clone {}
