//! ordered-containers: insertion-ordered hash containers and a sorted
//! tree set with live range views.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: build the containers in small, verifiable layers so each
//!   piece can be reasoned about independently.
//! - Hash side:
//!   - SeqTable<K, V, E>: structural core, a dense entry vector in
//!     insertion order plus a prime-sized bucket array of intrusive
//!     chains. Owns growth, rehashing, positional shifts, and the
//!     collision-upgrade heuristic.
//!   - OrderedMap<K, V, E> / OrderedSet<T, E>: typed façades adding map
//!     and set semantics, positional access, and std plumbing.
//!   - LinkedMap<K, V, S>: the simpler baseline, a delegate swiss
//!     table over an arena of doubly-linked nodes. Same external
//!     contract (insertion-ordered enumeration), different mechanism.
//! - Tree side:
//!   - TreeSet<T, O>: red-black tree with top-down balancing in a
//!     generational arena; sorted iteration, floor/ceiling and
//!     predecessor/successor queries, O(n) bulk construction.
//!   - TreeView<T>: a live bounded window holding keys into the tree's
//!     arena, never references; methods take the owning tree.
//! - Strategies: EqualityStrategy / OrderingStrategy are injected at
//!   construction and are the only way user code is consulted.
//!
//! Constraints
//! - Single-threaded: no internal locking or atomics. Corruption from
//!   unsynchronized sharing is *detected* best-effort (generation
//!   counters, chain-walk bounds), never prevented.
//! - Insertion order is the iteration order for the hash containers at
//!   all times: removals compact the entry array rather than leaving
//!   tombstones.
//! - The tree is the sole owner of its nodes. Views and cursors hold
//!   generational keys, so a stale handle can never resolve to a
//!   recycled slot.
//!
//! Versioning policy
//! - Every container carries a generation counter bumped on each
//!   structural mutation (insert, remove, clear, resize, rehash) and
//!   on capacity-only changes, but not on value overwrites in place.
//! - Borrowing iterators are immune by construction; the stepping
//!   cursors snapshot the counter and fail each step (and reset) with
//!   `ConcurrentModification` once it moves. That failure is fatal for
//!   the cursor: consistency beyond "did not crash" is not guaranteed.
//!
//! Failure boundaries
//! - Quiet absences return `bool`/`Option`; contract violations return
//!   `Err(Error)`; the `Index` sugar panics like std's; a detected
//!   chain cycle panics: the structure must be assumed corrupt.
//!
//! Notes and non-goals
//! - No persistence, serialization, or wire formats.
//! - Comparators/strategies must be internally consistent and stable
//!   for the container's lifetime; this is a documented precondition.
//! - The two `set` position semantics (stable vs move-to-end) are a
//!   real behavioral fork between the two map engines; `LinkedMap`
//!   exposes the choice as `PositionPolicy` instead of hiding it.

mod error;
mod guard;
mod linked_map;
mod ordered_map;
mod ordered_set;
mod seq_table;
mod seq_table_proptest;
mod set_algebra;
mod strategy;
mod tree_set;
mod tree_set_proptest;
mod tree_view;

pub use error::Error;
pub use linked_map::{LinkedCursor, LinkedIter, LinkedMap, PositionPolicy};
pub use ordered_map::{
    IntoIter as MapIntoIter, Iter as MapIter, IterMut as MapIterMut, Keys, MapCursor, OrderedMap,
    Values, ValuesMut,
};
pub use ordered_set::{IntoIter as SetIntoIter, Iter as SetIter, OrderedSet, SetCursor};
pub use strategy::{
    DefaultEquality, DefaultOrdering, EqualityStrategy, FnOrdering, OrderingStrategy,
    StringEquality,
};
pub use tree_set::{IntoIter as TreeIntoIter, Iter as TreeIter, TreeCursor, TreeSet};
pub use tree_view::{TreeView, ViewIter};
