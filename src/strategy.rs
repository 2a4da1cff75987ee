//! Injectable equality and ordering strategies.
//!
//! The hash containers never call `Hash`/`Eq`/`Ord` directly; they go
//! through a strategy object supplied at construction. This keeps the
//! comparer swappable at runtime, which the string strategy uses to
//! upgrade itself from a fast deterministic hash to a seeded one when a
//! probe sequence degenerates (an algorithmic-complexity attack on
//! string keys produces exactly that signature).
//!
//! Contract: `equals(a, b)` implies `hash(a) == hash(b)`, and a strategy
//! implemented for several key representations (e.g. `String` and `str`)
//! must hash them consistently so borrowed lookups resolve.

use core::cmp::Ordering;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// Hash-and-equality capability for keys of type `K`.
pub trait EqualityStrategy<K: ?Sized> {
    fn hash(&self, key: &K) -> u64;
    fn equals(&self, a: &K, b: &K) -> bool;

    /// Collision-hardened replacement for this strategy, or `None` when
    /// it is already randomized. The hash core swaps the strategy and
    /// rehashes once a single probe walks more than the collision
    /// threshold.
    fn randomized(&self) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}

/// Equality through `Hash + Eq` and a `BuildHasher`.
///
/// The default `RandomState` is seeded per instance, so this strategy
/// never needs the randomized upgrade.
#[derive(Clone, Debug, Default)]
pub struct DefaultEquality<S = RandomState> {
    build: S,
}

impl<S: BuildHasher> DefaultEquality<S> {
    pub fn with_hasher(build: S) -> Self {
        Self { build }
    }
}

impl<Q, S> EqualityStrategy<Q> for DefaultEquality<S>
where
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &Q) -> u64 {
        self.build.hash_one(key)
    }

    #[inline]
    fn equals(&self, a: &Q, b: &Q) -> bool {
        a == b
    }
}

/// Two-state string strategy: `Fast` is a deterministic 31-polynomial
/// over the bytes (cheap, but trivially collidable by an adversary);
/// `Randomized` is a per-instance seeded hasher. `randomized()` moves
/// from the former to the latter.
#[derive(Clone, Debug)]
pub enum StringEquality {
    Fast,
    Randomized(RandomState),
}

impl StringEquality {
    pub fn is_randomized(&self) -> bool {
        matches!(self, StringEquality::Randomized(_))
    }

    #[inline]
    fn hash_str(&self, s: &str) -> u64 {
        match self {
            StringEquality::Fast => {
                let mut h = 0u64;
                for &b in s.as_bytes() {
                    h = h.wrapping_mul(31).wrapping_add(u64::from(b));
                }
                h
            }
            StringEquality::Randomized(build) => build.hash_one(s),
        }
    }
}

impl Default for StringEquality {
    fn default() -> Self {
        StringEquality::Fast
    }
}

impl EqualityStrategy<str> for StringEquality {
    #[inline]
    fn hash(&self, key: &str) -> u64 {
        self.hash_str(key)
    }

    #[inline]
    fn equals(&self, a: &str, b: &str) -> bool {
        a == b
    }

    fn randomized(&self) -> Option<Self> {
        match self {
            StringEquality::Fast => Some(StringEquality::Randomized(RandomState::new())),
            StringEquality::Randomized(_) => None,
        }
    }
}

impl EqualityStrategy<String> for StringEquality {
    #[inline]
    fn hash(&self, key: &String) -> u64 {
        self.hash_str(key)
    }

    #[inline]
    fn equals(&self, a: &String, b: &String) -> bool {
        a == b
    }

    fn randomized(&self) -> Option<Self> {
        <Self as EqualityStrategy<str>>::randomized(self)
    }
}

/// Total-order capability for elements of type `T`.
///
/// The comparator is the sole source of truth for ordering and for
/// duplicate detection in the tree containers. It must impose a strict
/// total order that is stable for the lifetime of the container;
/// violating that produces an undefined tree shape (documented
/// precondition, not runtime-checked).
pub trait OrderingStrategy<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Ordering through `Ord`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultOrdering;

impl<T: ?Sized + Ord> OrderingStrategy<T> for DefaultOrdering {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Ordering through a caller-supplied comparator closure.
#[derive(Clone, Copy, Debug)]
pub struct FnOrdering<F>(pub F);

impl<T: ?Sized, F> OrderingStrategy<T> for FnOrdering<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: `String` and `str` hash identically through the same
    /// strategy instance, so borrowed lookups resolve.
    #[test]
    fn string_and_str_hash_consistently() {
        let upgraded =
            <StringEquality as EqualityStrategy<str>>::randomized(&StringEquality::Fast).unwrap();
        for eq in [StringEquality::Fast, upgraded] {
            let owned = String::from("hello");
            let h_owned = EqualityStrategy::<String>::hash(&eq, &owned);
            let h_borrowed = EqualityStrategy::<str>::hash(&eq, "hello");
            assert_eq!(h_owned, h_borrowed);
        }
    }

    /// Invariant: the fast string hash admits engineered collisions
    /// ("Aa"/"BB" pairs), which is exactly what the upgrade exists for.
    #[test]
    fn fast_hash_has_known_collisions() {
        let eq = StringEquality::Fast;
        assert_eq!(
            EqualityStrategy::<str>::hash(&eq, "Aa"),
            EqualityStrategy::<str>::hash(&eq, "BB")
        );
        assert_eq!(
            EqualityStrategy::<str>::hash(&eq, "AaAa"),
            EqualityStrategy::<str>::hash(&eq, "BBBB")
        );
        assert!(!EqualityStrategy::<str>::equals(&eq, "Aa", "BB"));
    }

    /// Invariant: `randomized()` upgrades `Fast` exactly once.
    #[test]
    fn randomized_upgrade_is_one_way() {
        let fast = StringEquality::Fast;
        assert!(!fast.is_randomized());
        let upgraded = <StringEquality as EqualityStrategy<str>>::randomized(&fast).unwrap();
        assert!(upgraded.is_randomized());
        assert!(<StringEquality as EqualityStrategy<str>>::randomized(&upgraded).is_none());
    }

    /// Invariant: the default equality is already seeded and reports no
    /// upgrade.
    #[test]
    fn default_equality_reports_no_upgrade() {
        let eq = DefaultEquality::<RandomState>::default();
        assert!(<DefaultEquality as EqualityStrategy<u32>>::randomized(&eq).is_none());
        assert!(EqualityStrategy::<u32>::equals(&eq, &1, &1));
        assert!(!EqualityStrategy::<u32>::equals(&eq, &1, &2));
    }

    /// Invariant: `FnOrdering` drives comparisons; a reversed comparator
    /// reverses the reported ordering.
    #[test]
    fn fn_ordering_reverses() {
        let forward = DefaultOrdering;
        let reverse = FnOrdering(|a: &i32, b: &i32| b.cmp(a));
        assert_eq!(forward.compare(&1, &2), Ordering::Less);
        assert_eq!(reverse.compare(&1, &2), Ordering::Greater);
    }
}
