//! Error types for memoseq
//!
//! The cache itself never fails: absence of a value is reported as
//! `Option`/`bool`, not as an error. The only error this crate
//! surfaces is a failure of an underlying fallible source, tagged with
//! the position that failed.

use thiserror::Error;

/// A fallible source failed while producing an item.
///
/// Returned by the [`TryMemoized`](crate::TryMemoized) operations. The
/// failed item is not cached and the source is *not* marked exhausted;
/// the same position may be retried, and what a retry yields is the
/// source's business.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("source failed while producing item {index}")]
pub struct SourceError<E> {
    /// Logical position the source was asked to produce.
    pub index: usize,

    /// The source's own failure, propagated unmodified.
    #[source]
    pub source: E,
}

impl<E> SourceError<E> {
    /// Discard the position tag and return the underlying failure.
    pub fn into_source(self) -> E {
        self.source
    }
}
