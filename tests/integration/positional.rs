//! Positional access: random-access retrieval over a single-pass source

use memoseq::{memoize, Memoized, MAX_CACHED};
use rstest::rstest;

use crate::support::{counted_source, MAX};

#[test_log::test]
fn random_access_pulls_exactly_through_the_index() {
    let (source, calls) = counted_source();
    let memo = Memoized::new(source);

    assert_eq!(memo.get(5), Some(5));
    assert_eq!(calls.get(), 6);

    // Everything up to and including the index is cached, nothing past.
    assert!(memo.has_cached(4));
    assert!(memo.has_cached(5));
    assert!(!memo.has_cached(6));
}

#[test]
fn cached_items_are_stable_for_the_cache_lifetime() {
    let memo = memoize(0..MAX);
    assert_eq!(memo.get(7), Some(7));

    // Later operations never disturb an already-cached position.
    memo.ensure(15);
    let _: Vec<_> = memo.cursor().collect();
    memo.get(100);

    assert!(memo.has_cached(7));
    assert_eq!(memo.get(7), Some(7));
    assert_eq!(memo.get(3), Some(3));
}

#[test]
fn no_position_is_requested_twice() {
    let (source, calls) = counted_source();
    let memo = Memoized::new(source);

    memo.get(5);
    memo.get(5);
    memo.get(3);
    memo.ensure(5);
    assert_eq!(calls.get(), 6);

    memo.get(9);
    assert_eq!(calls.get(), 10);

    // Draining past the end costs each position once plus the single
    // exhaustion probe.
    memo.ensure(1000);
    assert_eq!(calls.get(), MAX + 1);
}

#[test]
fn exhaustion_is_permanent() {
    let (source, calls) = counted_source();
    let memo = Memoized::new(source);

    assert!(!memo.ensure(MAX));
    assert!(memo.is_exhausted());
    let after_drain = calls.get();

    // Nothing ever touches the source again.
    assert!(!memo.ensure(MAX));
    assert_eq!(memo.get(MAX), None);
    assert!(!memo.advance());
    assert_eq!(calls.get(), after_drain);

    assert_eq!(memo.get(MAX - 1), Some(MAX - 1));
    assert!(memo.has_cached(MAX - 1));
    assert!(!memo.has_cached(MAX));
}

#[test]
fn advance_drives_production_manually() {
    let (source, calls) = counted_source();
    let memo = Memoized::new(source);

    assert!(memo.advance());
    assert!(memo.advance());
    assert_eq!(memo.len(), 2);
    assert_eq!(calls.get(), 2);
    assert_eq!(memo.get(1), Some(1));
    assert_eq!(calls.get(), 2);
}

#[test]
fn try_get_works_without_clone() {
    #[derive(Debug)]
    struct Opaque(usize);

    let memo = Memoized::new((0..MAX).map(Opaque));
    let mut seen = None;
    assert!(memo.try_get(5, |item| seen = Some(item.0)));
    assert_eq!(seen, Some(5));
    assert!(!memo.try_get(MAX, |_| unreachable!()));
}

#[rstest]
#[case(MAX_CACHED)]
#[case(MAX_CACHED + 10)]
#[case(usize::MAX)]
fn indices_beyond_the_bound_never_touch_the_source(#[case] index: usize) {
    let (source, calls) = counted_source();
    let memo = Memoized::new(source);

    assert!(!memo.has_cached(index));
    assert!(!memo.ensure(index));
    assert_eq!(memo.get(index), None);
    assert!(!memo.try_get(index, |_| unreachable!()));
    assert_eq!(calls.get(), 0);
    assert!(!memo.is_exhausted());
}
