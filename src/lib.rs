//! Memoseq - Memoizing cache for single-pass iterators
//!
//! Wraps any `Iterator` in an append-only cache so that multiple
//! independent cursors can replay the same sequence without re-running
//! the source's side effects, and so that items can be fetched by
//! position even though the source only supports forward, single-pass
//! access.
//!
//! # Example
//!
//! ```
//! use memoseq::memoize;
//!
//! let memo = memoize(0..5);
//!
//! // Random access pulls the source just far enough.
//! assert_eq!(memo.get(3), Some(3));
//! assert!(memo.has_cached(2));
//! assert!(!memo.has_cached(4));
//!
//! // Cursors replay from the start and share the cache.
//! let doubled: Vec<_> = memo.cursor().map(|n| n * 2).collect();
//! assert_eq!(doubled, vec![0, 2, 4, 6, 8]);
//! ```

pub mod cache;
pub mod error;

pub use cache::cursor::Cursor;
pub use cache::fallible::{TryCursor, TryMemoized};
pub use cache::{memoize, Memoized, MAX_CACHED};
pub use error::SourceError;
