//! Live bounded windows over a [`TreeSet`].
//!
//! A view owns its bounds and nothing else: its root is a borrowed key
//! into the tree's node arena, recomputed whenever the view's cached
//! version trails the tree's. Methods take the owning tree explicitly,
//! so the borrow checker, not convention, keeps the tree the sole
//! owner of the nodes; a cached key left stale by a removal simply
//! stops resolving thanks to the arena's generational keys (it is
//! recomputed before use anyway).
//!
//! Mutation through a view checks the bounds first (`RangeViolation`
//! outside them), then delegates to the tree and resynchronizes, so a
//! view and its tree always observe each other's writes.

use crate::error::Error;
use crate::strategy::OrderingStrategy;
use crate::tree_set::{NodeKey, TreeSet};
use core::ops::{Bound, RangeBounds};

pub struct TreeView<T> {
    lower: Bound<T>,
    upper: Bound<T>,
    /// Borrowed root: the topmost in-range node of the owning tree.
    root: Option<NodeKey>,
    version: u64,
    count: usize,
}

impl<T, O: OrderingStrategy<T>> TreeSet<T, O> {
    /// A live window over `range`. Fails with `InvalidArgument` when the
    /// lower bound exceeds the upper; equal bounds with exclusivity give
    /// an empty (but valid) view.
    pub fn view_between<R: RangeBounds<T>>(&self, range: R) -> Result<TreeView<T>, Error>
    where
        T: Clone,
    {
        let lower = range.start_bound().cloned();
        let upper = range.end_bound().cloned();
        if let (Bound::Included(l) | Bound::Excluded(l), Bound::Included(u) | Bound::Excluded(u)) =
            (&lower, &upper)
        {
            if self.ordering.compare(l, u) == core::cmp::Ordering::Greater {
                return Err(Error::InvalidArgument("lower bound exceeds upper bound"));
            }
        }
        let root = self.bounded_root(&lower, &upper);
        let count = self.bounded_count(root, &lower, &upper);
        Ok(TreeView {
            lower,
            upper,
            root,
            version: self.version.snapshot(),
            count,
        })
    }
}

impl<T> TreeView<T> {
    pub fn bounds(&self) -> (&Bound<T>, &Bound<T>) {
        (&self.lower, &self.upper)
    }

    /// Re-borrow the root and recount after the tree moved on. The
    /// recount is a bounded walk, the cost of correctness for derived
    /// views; no incremental bookkeeping is attempted.
    fn version_check<O: OrderingStrategy<T>>(&mut self, tree: &TreeSet<T, O>) {
        if !tree.version.matches(self.version) {
            self.root = tree.bounded_root(&self.lower, &self.upper);
            self.version = tree.version.snapshot();
            self.count = tree.bounded_count(self.root, &self.lower, &self.upper);
        }
    }

    fn in_range<O: OrderingStrategy<T>>(&self, tree: &TreeSet<T, O>, item: &T) -> bool {
        tree.above_lower(item, &self.lower) && tree.below_upper(item, &self.upper)
    }

    pub fn len<O: OrderingStrategy<T>>(&mut self, tree: &TreeSet<T, O>) -> usize {
        self.version_check(tree);
        self.count
    }

    pub fn is_empty<O: OrderingStrategy<T>>(&mut self, tree: &TreeSet<T, O>) -> bool {
        self.len(tree) == 0
    }

    pub fn contains<O: OrderingStrategy<T>>(&mut self, tree: &TreeSet<T, O>, item: &T) -> bool {
        self.version_check(tree);
        if !self.in_range(tree, item) {
            return false;
        }
        // search from the bounded root, not the tree root
        let mut current = self.root;
        while let Some(cur) = current {
            current = match tree.ordering.compare(item, &tree.nodes[cur].item) {
                core::cmp::Ordering::Equal => return true,
                core::cmp::Ordering::Less => tree.nodes[cur].left,
                core::cmp::Ordering::Greater => tree.nodes[cur].right,
            };
        }
        false
    }

    /// Insert through the view. `RangeViolation` outside the bounds;
    /// otherwise delegates to the tree (false on duplicate) and
    /// resynchronizes.
    pub fn insert<O: OrderingStrategy<T>>(
        &mut self,
        tree: &mut TreeSet<T, O>,
        item: T,
    ) -> Result<bool, Error> {
        if !self.in_range(tree, &item) {
            return Err(Error::RangeViolation);
        }
        let added = tree.insert(item);
        self.version_check(tree);
        Ok(added)
    }

    /// Remove through the view, with the same bounds contract as
    /// [`insert`](TreeView::insert).
    pub fn remove<O: OrderingStrategy<T>>(
        &mut self,
        tree: &mut TreeSet<T, O>,
        item: &T,
    ) -> Result<bool, Error> {
        if !self.in_range(tree, item) {
            return Err(Error::RangeViolation);
        }
        let removed = tree.remove(item);
        self.version_check(tree);
        Ok(removed)
    }

    pub fn min<'a, O: OrderingStrategy<T>>(&mut self, tree: &'a TreeSet<T, O>) -> Option<&'a T> {
        self.version_check(tree);
        let mut best = None;
        let mut current = self.root;
        while let Some(cur) = current {
            if tree.above_lower(&tree.nodes[cur].item, &self.lower) {
                best = Some(cur);
                current = tree.nodes[cur].left;
            } else {
                current = tree.nodes[cur].right;
            }
        }
        let item = &tree.nodes[best?].item;
        tree.below_upper(item, &self.upper).then_some(item)
    }

    pub fn max<'a, O: OrderingStrategy<T>>(&mut self, tree: &'a TreeSet<T, O>) -> Option<&'a T> {
        self.version_check(tree);
        let mut best = None;
        let mut current = self.root;
        while let Some(cur) = current {
            if tree.below_upper(&tree.nodes[cur].item, &self.upper) {
                best = Some(cur);
                current = tree.nodes[cur].right;
            } else {
                current = tree.nodes[cur].left;
            }
        }
        let item = &tree.nodes[best?].item;
        tree.above_lower(item, &self.lower).then_some(item)
    }

    /// Bounded in-order iteration over the window.
    pub fn iter<'a, O: OrderingStrategy<T>>(
        &mut self,
        tree: &'a TreeSet<T, O>,
    ) -> ViewIter<'a, '_, T, O> {
        self.version_check(tree);
        let mut iter = ViewIter {
            tree,
            lower: &self.lower,
            upper: &self.upper,
            stack: Vec::new(),
        };
        iter.push_left_in_range(self.root);
        iter
    }

    /// Derive a tighter view. The requested bounds must lie within this
    /// view's (`InvalidArgument` otherwise): a derived view can narrow
    /// a window, never widen it.
    pub fn narrow<O, R>(&self, tree: &TreeSet<T, O>, range: R) -> Result<TreeView<T>, Error>
    where
        T: Clone,
        O: OrderingStrategy<T>,
        R: RangeBounds<T>,
    {
        let lower = range.start_bound().cloned();
        let upper = range.end_bound().cloned();
        if !lower_within(tree, &self.lower, &lower) || !upper_within(tree, &self.upper, &upper) {
            return Err(Error::InvalidArgument("bounds fall outside the parent view"));
        }
        tree.view_between((lower, upper))
    }
}

/// Is `new` a lower bound at least as tight as `parent`?
fn lower_within<T, O: OrderingStrategy<T>>(
    tree: &TreeSet<T, O>,
    parent: &Bound<T>,
    new: &Bound<T>,
) -> bool {
    use core::cmp::Ordering::*;
    match (parent, new) {
        (Bound::Unbounded, _) => true,
        (_, Bound::Unbounded) => false,
        (Bound::Included(p), Bound::Included(n) | Bound::Excluded(n)) => {
            tree.ordering.compare(n, p) != Less
        }
        (Bound::Excluded(p), Bound::Included(n)) => tree.ordering.compare(n, p) == Greater,
        (Bound::Excluded(p), Bound::Excluded(n)) => tree.ordering.compare(n, p) != Less,
    }
}

/// Is `new` an upper bound at least as tight as `parent`?
fn upper_within<T, O: OrderingStrategy<T>>(
    tree: &TreeSet<T, O>,
    parent: &Bound<T>,
    new: &Bound<T>,
) -> bool {
    use core::cmp::Ordering::*;
    match (parent, new) {
        (Bound::Unbounded, _) => true,
        (_, Bound::Unbounded) => false,
        (Bound::Included(p), Bound::Included(n) | Bound::Excluded(n)) => {
            tree.ordering.compare(n, p) != Greater
        }
        (Bound::Excluded(p), Bound::Included(n)) => tree.ordering.compare(n, p) == Less,
        (Bound::Excluded(p), Bound::Excluded(n)) => tree.ordering.compare(n, p) != Greater,
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for TreeView<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TreeView")
            .field("lower", &self.lower)
            .field("upper", &self.upper)
            .field("count", &self.count)
            .finish()
    }
}

pub struct ViewIter<'a, 'v, T, O> {
    tree: &'a TreeSet<T, O>,
    lower: &'v Bound<T>,
    upper: &'v Bound<T>,
    stack: Vec<NodeKey>,
}

impl<'a, 'v, T, O: OrderingStrategy<T>> ViewIter<'a, 'v, T, O> {
    fn push_left_in_range(&mut self, mut current: Option<NodeKey>) {
        while let Some(cur) = current {
            if self.tree.above_lower(&self.tree.nodes[cur].item, self.lower) {
                self.stack.push(cur);
                current = self.tree.nodes[cur].left;
            } else {
                current = self.tree.nodes[cur].right;
            }
        }
    }
}

impl<'a, 'v, T, O: OrderingStrategy<T>> Iterator for ViewIter<'a, 'v, T, O> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.stack.pop()?;
        let item = &self.tree.nodes[key].item;
        if !self.tree.below_upper(item, self.upper) {
            // ascending walk has left the window; nothing later can return
            self.stack.clear();
            return None;
        }
        self.push_left_in_range(self.tree.nodes[key].right);
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn tree(items: &[i32]) -> TreeSet<i32> {
        items.iter().copied().collect()
    }

    fn items<O: OrderingStrategy<i32>>(
        view: &mut TreeView<i32>,
        tree: &TreeSet<i32, O>,
    ) -> Vec<i32> {
        view.iter(tree).copied().collect()
    }

    /// Invariant: a half-open window selects exactly the in-range
    /// elements, and mutations flow both ways between view and tree.
    #[test]
    fn window_selects_and_stays_live() {
        let mut t = tree(&[1, 3, 5, 7, 9]);
        let mut v = t.view_between(3..7).unwrap();
        assert_eq!(items(&mut v, &t), [3, 5]);
        assert_eq!(v.len(&t), 2);

        // write through the view, observe in the tree
        assert_eq!(v.insert(&mut t, 6), Ok(true));
        assert!(t.contains(&6));
        assert_eq!(items(&mut v, &t), [3, 5, 6]);
        assert_eq!(v.len(&t), 3);

        // out-of-range writes are rejected either way
        assert_eq!(v.insert(&mut t, 8), Err(Error::RangeViolation));
        assert_eq!(v.remove(&mut t, &9), Err(Error::RangeViolation));
        assert!(t.contains(&9));

        // write through the tree, observe in the view
        t.insert(4);
        t.remove(&5);
        assert_eq!(items(&mut v, &t), [3, 4, 6]);
        assert_eq!(v.len(&t), 3);
    }

    /// Invariant: bound inclusivity is honored on both ends.
    #[test]
    fn bound_inclusivity() {
        let t = tree(&[1, 3, 5, 7, 9]);
        let mut v = t.view_between(3..=7).unwrap();
        assert_eq!(items(&mut v, &t), [3, 5, 7]);

        let mut v = t
            .view_between((Bound::Excluded(3), Bound::Excluded(7)))
            .unwrap();
        assert_eq!(items(&mut v, &t), [5]);

        let mut v = t.view_between(..).unwrap();
        assert_eq!(items(&mut v, &t), [1, 3, 5, 7, 9]);

        let mut v = t.view_between(8..).unwrap();
        assert_eq!(items(&mut v, &t), [9]);
        assert_eq!(v.min(&t), Some(&9));
        assert_eq!(v.max(&t), Some(&9));
    }

    /// Invariant: inverted bounds are an argument error; an empty
    /// in-order window is merely empty.
    #[test]
    fn inverted_and_empty_windows() {
        let t = tree(&[1, 2, 3]);
        assert_eq!(
            t.view_between(5..2).unwrap_err(),
            Error::InvalidArgument("lower bound exceeds upper bound")
        );
        let mut v = t
            .view_between((Bound::Excluded(2), Bound::Excluded(2)))
            .unwrap();
        assert_eq!(v.len(&t), 0);
        assert!(v.is_empty(&t));
        assert_eq!(v.min(&t), None);
        assert_eq!(v.max(&t), None);
        assert!(!v.contains(&t, &2));
    }

    /// Invariant: view membership respects bounds even for elements
    /// present in the tree.
    #[test]
    fn contains_is_bounded() {
        let t = tree(&[1, 3, 5, 7]);
        let mut v = t.view_between(3..=5).unwrap();
        assert!(v.contains(&t, &3));
        assert!(v.contains(&t, &5));
        assert!(!v.contains(&t, &1));
        assert!(!v.contains(&t, &7));
    }

    /// Invariant: a derived view can narrow but never widen, and stays
    /// live against the tree like its parent.
    #[test]
    fn narrowed_views() {
        let mut t = tree(&[1, 3, 5, 7, 9]);
        let mut v = t.view_between(3..=9).unwrap();
        let mut narrow = v.narrow(&t, 5..=7).unwrap();
        assert_eq!(items(&mut narrow, &t), [5, 7]);

        assert_eq!(
            v.narrow(&t, 1..=7).unwrap_err(),
            Error::InvalidArgument("bounds fall outside the parent view")
        );

        t.insert(6);
        assert_eq!(items(&mut narrow, &t), [5, 6, 7]);
        assert_eq!(narrow.insert(&mut t, 9), Err(Error::RangeViolation));
    }

    /// Invariant: removing the view's borrowed root leaves the view
    /// consistent after resynchronization (the stale key cannot
    /// resolve to a recycled slot).
    #[test]
    fn root_removal_resyncs() {
        let mut t = tree(&[2, 4, 6, 8]);
        let mut v = t.view_between(4..=8).unwrap();
        assert_eq!(v.len(&t), 3);
        // remove elements until the whole window is gone, churning the arena
        for x in [4, 6, 8] {
            assert_eq!(v.remove(&mut t, &x), Ok(true));
            t.insert(1); // arena slot reuse pressure
            t.remove(&1);
        }
        assert_eq!(v.len(&t), 0);
        assert_eq!(items(&mut v, &t), []);
        assert_eq!(v.insert(&mut t, 5), Ok(true));
        assert_eq!(items(&mut v, &t), [5]);
    }
}
