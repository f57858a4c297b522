//! Fallible sources: failure propagates, exhaustion does not lie

use memoseq::{SourceError, TryMemoized};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("record {0} unreadable")]
struct ReadError(usize);

fn flaky_source() -> Vec<Result<usize, ReadError>> {
    vec![Ok(0), Ok(1), Err(ReadError(2)), Ok(2), Ok(3)]
}

#[test_log::test]
fn failures_propagate_with_their_position() {
    let memo = TryMemoized::new(flaky_source());

    let err = memo.get(3).unwrap_err();
    assert_eq!(err.index, 2);
    assert_eq!(err.source, ReadError(2));

    // The successful prefix was cached before the failure.
    assert_eq!(memo.len(), 2);
    assert!(memo.has_cached(1));
}

#[test]
fn a_failure_is_not_exhaustion() {
    let memo = TryMemoized::new(flaky_source());
    assert!(memo.try_ensure(4).is_err());
    assert!(!memo.is_exhausted());

    // Retrying resumes where the source left off.
    assert!(memo.try_ensure(3).unwrap());
    assert!(!memo.try_ensure(4).unwrap());
    assert!(memo.is_exhausted());
}

#[test]
fn cached_items_are_served_without_re_pulling_a_broken_source() {
    let memo = TryMemoized::new(vec![Ok(7), Err(ReadError(1))]);
    assert_eq!(memo.get(0).unwrap(), Some(7));

    assert!(memo.get(1).is_err());
    // Position 0 is still served from the store, error or not.
    assert_eq!(memo.get(0).unwrap(), Some(7));
}

#[test]
fn cursor_surfaces_errors_and_resumes() {
    let memo = TryMemoized::new(flaky_source());
    let collected: Vec<_> = memo.cursor().collect();

    assert_eq!(
        collected,
        vec![
            Ok(0),
            Ok(1),
            Err(SourceError {
                index: 2,
                source: ReadError(2),
            }),
            Ok(2),
            Ok(3),
        ],
    );
}

#[test]
fn error_chain_reaches_the_source() {
    use std::error::Error as _;

    let memo = TryMemoized::new(flaky_source());
    let err = memo.get(2).unwrap_err();
    assert_eq!(err.to_string(), "source failed while producing item 2");
    let cause = err.source().expect("source error has a cause");
    assert_eq!(cause.to_string(), "record 2 unreadable");
}

#[test]
fn into_source_recovers_the_original_error() {
    let memo = TryMemoized::new(flaky_source());
    let err = memo.get(2).unwrap_err();
    assert_eq!(err.into_source(), ReadError(2));
}
