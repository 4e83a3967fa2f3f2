use std::collections::BTreeSet;
use std::ops::{Bound, ControlFlow};

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rbtree_collections::{Natural, RBTreeSet, Reversed};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 10_000;

/// Generates values in a range that ensures collisions.
fn value_strategy() -> impl Strategy<Value = i64> {
    -20_000i64..20_000i64
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i64),
    Remove(i64),
    Contains(i64),
    Floor(i64),
    Ceiling(i64),
    Lower(i64),
    Higher(i64),
    First,
    Last,
    PopFirst,
    PopLast,
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => value_strategy().prop_map(SetOp::Insert),
        3 => value_strategy().prop_map(SetOp::Remove),
        2 => value_strategy().prop_map(SetOp::Contains),
        1 => value_strategy().prop_map(SetOp::Floor),
        1 => value_strategy().prop_map(SetOp::Ceiling),
        1 => value_strategy().prop_map(SetOp::Lower),
        1 => value_strategy().prop_map(SetOp::Higher),
        1 => Just(SetOp::First),
        1 => Just(SetOp::Last),
        1 => Just(SetOp::PopFirst),
        1 => Just(SetOp::PopLast),
    ]
}

// ─── Core CRUD operations ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both RBTreeSet and BTreeSet
    /// and asserts identical results at every step.
    #[test]
    fn set_ops_match_btreeset(ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE)) {
        let mut rb_set: RBTreeSet<i64> = RBTreeSet::new();
        let mut bt_set: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                SetOp::Insert(v) => {
                    prop_assert_eq!(rb_set.insert(*v), bt_set.insert(*v), "insert({})", v);
                }
                SetOp::Remove(v) => {
                    prop_assert_eq!(rb_set.remove(v), bt_set.remove(v), "remove({})", v);
                }
                SetOp::Contains(v) => {
                    prop_assert_eq!(rb_set.contains(v), bt_set.contains(v), "contains({})", v);
                }
                SetOp::Floor(v) => {
                    prop_assert_eq!(rb_set.floor(v), bt_set.range(..=*v).next_back(), "floor({})", v);
                }
                SetOp::Ceiling(v) => {
                    prop_assert_eq!(rb_set.ceiling(v), bt_set.range(*v..).next(), "ceiling({})", v);
                }
                SetOp::Lower(v) => {
                    prop_assert_eq!(rb_set.lower(v), bt_set.range(..*v).next_back(), "lower({})", v);
                }
                SetOp::Higher(v) => {
                    let bt_result = bt_set.range((Bound::Excluded(*v), Bound::Unbounded)).next();
                    prop_assert_eq!(rb_set.higher(v), bt_result, "higher({})", v);
                }
                SetOp::First => {
                    prop_assert_eq!(rb_set.first(), bt_set.first(), "first");
                }
                SetOp::Last => {
                    prop_assert_eq!(rb_set.last(), bt_set.last(), "last");
                }
                SetOp::PopFirst => {
                    prop_assert_eq!(rb_set.pop_first(), bt_set.pop_first(), "pop_first");
                }
                SetOp::PopLast => {
                    prop_assert_eq!(rb_set.pop_last(), bt_set.pop_last(), "pop_last");
                }
            }
            prop_assert_eq!(rb_set.len(), bt_set.len(), "len mismatch after {:?}", op);
        }
    }

    /// Tests that iteration order matches BTreeSet after random insertions.
    #[test]
    fn iter_matches_btreeset(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        let bt_set: BTreeSet<i64> = values.iter().copied().collect();

        prop_assert_eq!(rb_set.iter().collect::<Vec<_>>(), bt_set.iter().collect::<Vec<_>>(), "iter() mismatch");
        prop_assert_eq!(
            rb_set.iter().rev().collect::<Vec<_>>(),
            bt_set.iter().rev().collect::<Vec<_>>(),
            "iter().rev() mismatch"
        );
        prop_assert_eq!(rb_set.iter().len(), bt_set.len());
        prop_assert_eq!(rb_set.into_iter().collect::<Vec<_>>(), bt_set.into_iter().collect::<Vec<_>>());
    }

    /// Tests range queries match BTreeSet.
    #[test]
    fn range_matches_btreeset(
        values in proptest::collection::vec(value_strategy(), TEST_SIZE),
        lo in value_strategy(),
        hi in value_strategy(),
    ) {
        let rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        let bt_set: BTreeSet<i64> = values.iter().copied().collect();
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };

        prop_assert_eq!(
            rb_set.range(lo..=hi).collect::<Vec<_>>(),
            bt_set.range(lo..=hi).collect::<Vec<_>>(),
            "range({}..={}) mismatch", lo, hi
        );
        prop_assert_eq!(
            rb_set.range(lo..hi).rev().collect::<Vec<_>>(),
            bt_set.range(lo..hi).rev().collect::<Vec<_>>(),
            "range({}..{}).rev() mismatch", lo, hi
        );
        prop_assert_eq!(
            rb_set.range((Bound::Excluded(lo), Bound::Unbounded)).collect::<Vec<_>>(),
            bt_set.range((Bound::Excluded(lo), Bound::Unbounded)).collect::<Vec<_>>(),
            "range(({}, ..)) mismatch", lo
        );
    }

    /// Tests sub_set against BTreeSet::range for ordered boundaries.
    #[test]
    fn sub_set_matches_btreeset(
        values in proptest::collection::vec(value_strategy(), TEST_SIZE),
        lo in value_strategy(),
        hi in value_strategy(),
        lo_inclusive in any::<bool>(),
        hi_inclusive in any::<bool>(),
    ) {
        let rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        let bt_set: BTreeSet<i64> = values.iter().copied().collect();
        let (lo, hi) = if lo < hi { (lo, hi) } else { (hi, lo + 1) };

        let start = if lo_inclusive { Bound::Included(lo) } else { Bound::Excluded(lo) };
        let end = if hi_inclusive { Bound::Included(hi) } else { Bound::Excluded(hi) };

        let sub = rb_set.sub_set(&lo, lo_inclusive, &hi, hi_inclusive);
        prop_assert_eq!(
            sub.iter().collect::<Vec<_>>(),
            bt_set.range((start, end)).collect::<Vec<_>>(),
            "sub_set({}, {}, {}, {})", lo, lo_inclusive, hi, hi_inclusive
        );
    }

    /// Tests retain matches BTreeSet.
    #[test]
    fn retain_matches_btreeset(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let mut rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        let mut bt_set: BTreeSet<i64> = values.iter().copied().collect();

        rb_set.retain(|v| v % 3 != 0);
        bt_set.retain(|v| v % 3 != 0);

        prop_assert_eq!(rb_set.iter().collect::<Vec<_>>(), bt_set.iter().collect::<Vec<_>>(), "retain mismatch");
    }

    /// Tests take and replace against BTreeSet.
    #[test]
    fn take_and_replace_match_btreeset(
        values in proptest::collection::vec(value_strategy(), TEST_SIZE),
        probes in proptest::collection::vec(value_strategy(), 500),
    ) {
        let mut rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        let mut bt_set: BTreeSet<i64> = values.iter().copied().collect();

        for p in &probes {
            if p % 2 == 0 {
                prop_assert_eq!(rb_set.take(p), bt_set.take(p), "take({})", p);
            } else {
                prop_assert_eq!(rb_set.replace(*p), bt_set.replace(*p), "replace({})", p);
            }
        }
        prop_assert_eq!(rb_set.iter().collect::<Vec<_>>(), bt_set.iter().collect::<Vec<_>>());
    }

    /// Tests that clear empties the set and the set remains usable.
    #[test]
    fn clear_empties_set(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let mut rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        rb_set.clear();
        prop_assert!(rb_set.is_empty());
        prop_assert_eq!(rb_set.first(), None);

        rb_set.extend(values.iter().take(3));
        prop_assert_eq!(rb_set.len(), values.iter().take(3).collect::<BTreeSet<_>>().len());
    }

    /// Tests that ordering between sets matches BTreeSet's.
    #[test]
    fn ord_matches_btreeset(
        a in proptest::collection::vec(0i64..40, 0..20),
        b in proptest::collection::vec(0i64..40, 0..20),
    ) {
        let rb_a: RBTreeSet<i64> = a.iter().copied().collect();
        let rb_b: RBTreeSet<i64> = b.iter().copied().collect();
        let bt_a: BTreeSet<i64> = a.iter().copied().collect();
        let bt_b: BTreeSet<i64> = b.iter().copied().collect();

        prop_assert_eq!(rb_a == rb_b, bt_a == bt_b);
        prop_assert_eq!(rb_a.partial_cmp(&rb_b), bt_a.partial_cmp(&bt_b));
    }

    /// Tests that a reversed comparator iterates the model backwards.
    #[test]
    fn reversed_set_iterates_backwards(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let mut rb_set = RBTreeSet::with_comparator(Reversed(Natural));
        rb_set.extend(values.iter().copied());
        let bt_set: BTreeSet<i64> = values.iter().copied().collect();

        prop_assert_eq!(rb_set.iter().collect::<Vec<_>>(), bt_set.iter().rev().collect::<Vec<_>>());
        prop_assert_eq!(rb_set.first(), bt_set.last());
    }
}

// ─── Fixed scenarios ─────────────────────────────────────────────────────────

#[test]
fn sub_set_extracts_between_boundaries() {
    let set = RBTreeSet::from([1, 3, 5, 7, 9]);

    assert_eq!(set.sub_set(&3, true, &7, false).into_iter().collect::<Vec<_>>(), [3, 5]);
    assert_eq!(set.sub_set(&4, true, &7, true).into_iter().collect::<Vec<_>>(), [5, 7]);
    assert!(set.sub_set(&100, true, &200, true).is_empty());
    assert!(set.sub_set(&9, true, &1, true).is_empty());
}

#[test]
fn directional_walks_stop_on_break() {
    let set: RBTreeSet<i32> = (1..=10).collect();

    let mut up = Vec::new();
    set.ascending_from(&4, false, |&x| {
        up.push(x);
        if x == 7 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
    });
    assert_eq!(up, [5, 6, 7]);

    let mut down = Vec::new();
    set.descending_from(&4, true, |&x| {
        down.push(x);
        ControlFlow::Continue(())
    });
    assert_eq!(down, [4, 3, 2, 1]);

    let mut none = Vec::new();
    set.ascending_from(&10, false, |&x| {
        none.push(x);
        ControlFlow::Continue(())
    });
    assert!(none.is_empty());
}

#[test]
fn navigation_is_strict_or_inclusive() {
    let set = RBTreeSet::from([10, 20, 30]);

    assert_eq!(set.floor(&20), Some(&20));
    assert_eq!(set.lower(&20), Some(&10));
    assert_eq!(set.ceiling(&20), Some(&20));
    assert_eq!(set.higher(&20), Some(&30));
    assert_eq!(set.floor(&5), None);
    assert_eq!(set.higher(&30), None);
}

#[test]
fn string_set_queried_by_str() {
    let set: RBTreeSet<String> = ["pear", "apple", "fig"].into_iter().map(String::from).collect();

    assert!(set.contains("fig"));
    assert_eq!(set.get("apple").map(String::as_str), Some("apple"));
    assert_eq!(set.ceiling("b").map(String::as_str), Some("fig"));
    assert_eq!(set.iter().map(String::as_str).collect::<Vec<_>>(), ["apple", "fig", "pear"]);
}

#[test]
fn debug_lists_elements_in_order() {
    let set = RBTreeSet::from([3, 1, 2]);
    assert_eq!(format!("{set:?}"), "{1, 2, 3}");
}

// ─── Invalid range bounds panic tests ─────────────────────────────────────────

/// Tests that range with start > end panics just like BTreeSet.
#[test]
#[should_panic(expected = "range start is greater than range end")]
fn range_start_greater_than_end_panics() {
    let set: RBTreeSet<i32> = [1, 2, 3].into_iter().collect();
    let _: Vec<_> = set.range((Bound::Included(5), Bound::Included(3))).collect();
}

/// Tests that range with (Excluded(x), Excluded(x)) for same x panics.
#[test]
#[should_panic]
fn range_excluded_excluded_same_bound_panics() {
    let set: RBTreeSet<i32> = [1, 2, 3].into_iter().collect();
    let _: Vec<_> = set.range((Bound::Excluded(2), Bound::Excluded(2))).collect();
}

/// Compile-time assertions for Send/Sync bounds on iterators.
mod send_sync_tests {
    use rbtree_collections::RBTreeSet;
    use rbtree_collections::rbtree_set::{IntoIter, Iter, Range};

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn set_and_iterators_are_send_sync() {
        assert_send::<RBTreeSet<i64>>();
        assert_sync::<RBTreeSet<i64>>();
        assert_send::<Iter<'_, i64>>();
        assert_sync::<Iter<'_, i64>>();
        assert_send::<IntoIter<i64>>();
        assert_sync::<IntoIter<i64>>();
        assert_send::<Range<'_, i64>>();
        assert_sync::<Range<'_, i64>>();
    }
}
