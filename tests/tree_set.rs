// Public-API suite for the tree set and its range views.
//
// The core invariants exercised:
// - Sorted iteration and the weak/strict navigation queries.
// - Views are live windows: mutations are visible in both directions,
//   bounds gate view-side writes, and view counts resynchronize.
// - Cursors fail with ConcurrentModification after tree mutation.
// - Bulk construction, cloning, and algebra preserve the contract.

use ordered_containers::{Error, FnOrdering, TreeSet};
use std::ops::Bound;

// Test: sorted iteration from unsorted input.
// Verifies: in-order traversal is strictly increasing.
#[test]
fn sorted_iteration() {
    let mut tree = TreeSet::new();
    for x in [42, 7, 19, 3, 25, 11] {
        assert!(tree.insert(x));
    }
    let items: Vec<_> = tree.iter().copied().collect();
    assert_eq!(items, [3, 7, 11, 19, 25, 42]);
    assert_eq!(tree.min(), Some(&3));
    assert_eq!(tree.max(), Some(&42));
}

// Test: navigation boundary cases on {2, 4, 6}.
// Verifies: floor/ceiling at, between, and beyond the extremes.
#[test]
fn floor_ceiling_boundaries() {
    let tree: TreeSet<i32> = [2, 4, 6].into_iter().collect();
    assert_eq!(tree.floor(&1), None);
    assert_eq!(tree.floor(&2), Some(&2));
    assert_eq!(tree.ceiling(&6), Some(&6));
    assert_eq!(tree.ceiling(&7), None);
    assert_eq!(tree.predecessor(&2), None);
    assert_eq!(tree.successor(&6), None);
    assert_eq!(tree.predecessor(&7), Some(&6));
    assert_eq!(tree.successor(&1), Some(&2));
}

// Test: the canonical view scenario on {1, 3, 5, 7, 9}.
// Verifies: [3, 7) selects {3, 5}; adding 6 through the view is seen by
// the tree; adding 8 through the view is a RangeViolation.
#[test]
fn view_between_scenario() {
    let mut tree: TreeSet<i32> = [1, 3, 5, 7, 9].into_iter().collect();
    let mut view = tree
        .view_between((Bound::Included(3), Bound::Excluded(7)))
        .unwrap();

    let items: Vec<_> = view.iter(&tree).copied().collect();
    assert_eq!(items, [3, 5]);

    assert_eq!(view.insert(&mut tree, 6), Ok(true));
    assert!(tree.contains(&6));
    let items: Vec<_> = view.iter(&tree).copied().collect();
    assert_eq!(items, [3, 5, 6]);

    assert_eq!(view.insert(&mut tree, 8), Err(Error::RangeViolation));
    assert!(!tree.contains(&8));
}

// Test: view liveness in the other direction.
// Verifies: tree-side writes appear in the view without touching it.
#[test]
fn view_observes_tree_writes() {
    let mut tree: TreeSet<i32> = (0..20).step_by(2).collect();
    let mut view = tree.view_between(5..15).unwrap();
    assert_eq!(view.len(&tree), 5); // 6, 8, 10, 12, 14

    tree.insert(7);
    tree.remove(&8);
    let items: Vec<_> = view.iter(&tree).copied().collect();
    assert_eq!(items, [6, 7, 10, 12, 14]);
    assert_eq!(view.len(&tree), 5);
    assert!(view.contains(&tree, &7));
    assert!(!view.contains(&tree, &16), "in tree but outside the window");
}

// Test: inverted bounds.
// Verifies: view construction rejects lower > upper as InvalidArgument.
#[test]
fn view_rejects_inverted_bounds() {
    let tree: TreeSet<i32> = [1, 2, 3].into_iter().collect();
    assert!(matches!(
        tree.view_between(9..1),
        Err(Error::InvalidArgument(_))
    ));
}

// Test: cursor over a mutating tree.
// Verifies: sorted stepping, then ConcurrentModification after insert.
#[test]
fn tree_cursor_contract() {
    let mut tree: TreeSet<i32> = [10, 20, 30].into_iter().collect();
    let mut cursor = tree.cursor();
    assert_eq!(cursor.move_next(&tree), Ok(Some(&10)));

    tree.insert(5);
    assert_eq!(cursor.move_next(&tree), Err(Error::ConcurrentModification));

    let mut cursor = tree.cursor();
    let mut walked = Vec::new();
    while let Some(x) = cursor.move_next(&tree).unwrap() {
        walked.push(*x);
    }
    assert_eq!(walked, [5, 10, 20, 30]);
}

// Test: duplicate detection belongs to the comparator.
// Verifies: a custom ordering strategy collapses comparator-equal
// elements even when they differ by Eq.
#[test]
fn comparator_owns_duplicates() {
    let by_len = FnOrdering(|a: &&str, b: &&str| a.len().cmp(&b.len()));
    let mut tree = TreeSet::with_ordering(by_len);
    assert!(tree.insert("ab"));
    assert!(!tree.insert("xy"), "same length compares equal");
    assert!(tree.insert("abc"));
    assert_eq!(tree.len(), 2);
}

// Test: set algebra on trees.
// Verifies: union/intersect/except/symmetric-except and predicates.
#[test]
fn tree_algebra() {
    let mut tree: TreeSet<i32> = [1, 2, 3, 4, 5].into_iter().collect();
    tree.except_with([2, 4]);
    tree.union_with([6]);
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3, 5, 6]);

    tree.intersect_with(&[3, 5, 6, 9].into_iter().collect());
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 5, 6]);

    tree.symmetric_except_with([5, 7]);
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 6, 7]);

    let small: TreeSet<i32> = [3, 7].into_iter().collect();
    assert!(small.is_subset(&tree));
    assert!(tree.is_proper_superset(&small));
    assert!(tree.overlaps(&small));
    assert!(!tree.set_equals(&small));
}

// Test: bulk load vs incremental and clone independence.
// Verifies: FromIterator sorts and dedupes; clone shares nothing.
#[test]
fn bulk_load_and_clone() {
    let bulk: TreeSet<i32> = [9, 1, 5, 1, 9, 3].into_iter().collect();
    assert_eq!(bulk.iter().copied().collect::<Vec<_>>(), [1, 3, 5, 9]);

    let mut copy = bulk.clone();
    copy.remove(&5);
    assert!(bulk.contains(&5));
    assert_eq!(copy.iter().copied().collect::<Vec<_>>(), [1, 3, 9]);
}

// Test: draining iteration.
// Verifies: into_iter yields sorted order and consumes the tree.
#[test]
fn into_iter_sorted() {
    let tree: TreeSet<i32> = [3, 1, 2].into_iter().collect();
    assert_eq!(tree.into_iter().collect::<Vec<_>>(), [1, 2, 3]);
}

// Test: a derived (narrowed) view.
// Verifies: narrowing within bounds works; widening is rejected.
#[test]
fn narrowed_view() {
    let tree: TreeSet<i32> = (0..10).collect();
    let view = tree.view_between(2..=8).unwrap();
    let mut inner = view.narrow(&tree, 4..=6).unwrap();
    assert_eq!(inner.iter(&tree).copied().collect::<Vec<_>>(), [4, 5, 6]);
    assert!(matches!(
        view.narrow(&tree, 0..=6),
        Err(Error::InvalidArgument(_))
    ));
}
