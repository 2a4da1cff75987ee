#![cfg(test)]

// Property tests for the tree set and its range views, kept inside the
// crate so they can call the red-black invariant checker.

use crate::error::Error;
use crate::tree_set::TreeSet;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::ops::Bound;

#[derive(Clone, Debug)]
enum Op {
    Insert(i8),
    Remove(i8),
    Contains(i8),
    Floor(i8),
    Ceiling(i8),
    Predecessor(i8),
    Successor(i8),
    MinMax,
    Iterate,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        any::<i8>().prop_map(Op::Insert),
        any::<i8>().prop_map(Op::Remove),
        any::<i8>().prop_map(Op::Contains),
        any::<i8>().prop_map(Op::Floor),
        any::<i8>().prop_map(Op::Ceiling),
        any::<i8>().prop_map(Op::Predecessor),
        any::<i8>().prop_map(Op::Successor),
        Just(Op::MinMax),
        Just(Op::Iterate),
    ];
    proptest::collection::vec(op, 1..120)
}

// Property: state-machine equivalence against `BTreeSet`, with the full
// red-black invariant suite re-checked after every mutation.
// Invariants exercised:
// - insert/remove booleans and membership match the model.
// - floor/ceiling are weak (≤/≥), predecessor/successor strict (</>).
// - in-order iteration equals the model's sorted order.
// - root black, no red-red edge, uniform black height, arena holds
//   exactly the reachable nodes.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_tree_matches_btreeset(ops in arb_ops()) {
        let mut sut: TreeSet<i8> = TreeSet::new();
        let mut model: BTreeSet<i8> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(x) => {
                    prop_assert_eq!(sut.insert(x), model.insert(x));
                    sut.check_invariants();
                }
                Op::Remove(x) => {
                    prop_assert_eq!(sut.remove(&x), model.remove(&x));
                    sut.check_invariants();
                }
                Op::Contains(x) => prop_assert_eq!(sut.contains(&x), model.contains(&x)),
                Op::Floor(x) => {
                    prop_assert_eq!(sut.floor(&x), model.range(..=x).next_back());
                }
                Op::Ceiling(x) => {
                    prop_assert_eq!(sut.ceiling(&x), model.range(x..).next());
                }
                Op::Predecessor(x) => {
                    prop_assert_eq!(sut.predecessor(&x), model.range(..x).next_back());
                }
                Op::Successor(x) => {
                    prop_assert_eq!(
                        sut.successor(&x),
                        model.range((Bound::Excluded(x), Bound::Unbounded)).next()
                    );
                }
                Op::MinMax => {
                    prop_assert_eq!(sut.min(), model.first());
                    prop_assert_eq!(sut.max(), model.last());
                }
                Op::Iterate => {
                    let got: Vec<i8> = sut.iter().copied().collect();
                    let want: Vec<i8> = model.iter().copied().collect();
                    prop_assert_eq!(got, want);
                }
            }
            prop_assert_eq!(sut.len(), model.len());
        }
    }
}

// Property: bulk construction from an arbitrary (duplicated, unsorted)
// sequence equals element-wise insertion and satisfies the invariants.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_bulk_build_equals_incremental(items in proptest::collection::vec(any::<i8>(), 0..200)) {
        let bulk: TreeSet<i8> = items.iter().copied().collect();
        bulk.check_invariants();

        let mut incremental = TreeSet::new();
        for &x in &items {
            incremental.insert(x);
        }
        prop_assert_eq!(&bulk, &incremental);

        let model: BTreeSet<i8> = items.iter().copied().collect();
        let got: Vec<i8> = bulk.iter().copied().collect();
        let want: Vec<i8> = model.iter().copied().collect();
        prop_assert_eq!(got, want);
    }
}

// Property: a range view tracks the underlying tree across interleaved
// writes on both sides, and its bounds gate every view mutation.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_view_tracks_tree(
        seed in proptest::collection::btree_set(any::<i8>(), 0..40),
        bounds in (any::<i8>(), any::<i8>()),
        writes in proptest::collection::vec((any::<bool>(), any::<i8>()), 0..40),
    ) {
        let (lo, hi) = (bounds.0.min(bounds.1), bounds.0.max(bounds.1));
        let mut sut: TreeSet<i8> = seed.iter().copied().collect();
        let mut model: BTreeSet<i8> = seed;
        let mut view = sut.view_between(lo..=hi).unwrap();

        for (through_view, x) in writes {
            let in_range = (lo..=hi).contains(&x);
            if through_view {
                // toggle membership through the view
                if in_range {
                    if model.contains(&x) {
                        prop_assert_eq!(view.remove(&mut sut, &x), Ok(true));
                        model.remove(&x);
                    } else {
                        prop_assert_eq!(view.insert(&mut sut, x), Ok(true));
                        model.insert(x);
                    }
                } else {
                    prop_assert_eq!(view.insert(&mut sut, x), Err(Error::RangeViolation));
                    prop_assert_eq!(view.remove(&mut sut, &x), Err(Error::RangeViolation));
                }
            } else {
                // write through the tree; the view must observe it
                if model.contains(&x) {
                    sut.remove(&x);
                    model.remove(&x);
                } else {
                    sut.insert(x);
                    model.insert(x);
                }
            }

            sut.check_invariants();
            let got: Vec<i8> = view.iter(&sut).copied().collect();
            let want: Vec<i8> = model.range(lo..=hi).copied().collect();
            prop_assert_eq!(got, want);
            prop_assert_eq!(view.len(&sut), model.range(lo..=hi).count());
        }
    }
}
