//! Insertion-ordered map over a delegate hash table and a linked list.
//!
//! The simpler baseline: a swiss-table index (`hashbrown::HashTable`)
//! resolves keys to nodes in a generational arena, and a doubly-linked
//! list threaded through the nodes carries the order. Lookup cost comes
//! from the delegate table, order from the links; nothing here owns a
//! bucket chain.
//!
//! The one deliberate behavioral knob is [`PositionPolicy`]: what `set`
//! does to the position of an existing key. The bucket-index map always
//! overwrites in place; the linked variant's native behavior is to
//! reposition at the end. Both are available here, chosen at
//! construction, so neither semantic is silently imposed.

use crate::error::Error;
use crate::guard::{DebugReentrancy, Version};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::ops::Index;
use hashbrown::HashTable;
use slotmap::SlotMap;
use std::collections::hash_map::RandomState;

slotmap::new_key_type! {
    pub(crate) struct LinkKey;
}

/// What `set` does to the position of an existing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionPolicy {
    /// Overwrite the value in place; the key keeps its position.
    Stable,
    /// Unlink the entry and append it, as if freshly inserted.
    #[default]
    MoveToEnd,
}

#[derive(Debug)]
struct LinkedEntry<K, V> {
    hash: u64,
    key: K,
    value: V,
    prev: Option<LinkKey>,
    next: Option<LinkKey>,
}

pub struct LinkedMap<K, V, S = RandomState> {
    hasher: S,
    index: HashTable<LinkKey>,
    nodes: SlotMap<LinkKey, LinkedEntry<K, V>>,
    head: Option<LinkKey>,
    tail: Option<LinkKey>,
    policy: PositionPolicy,
    version: Version,
    reentrancy: DebugReentrancy,
}

impl<K, V> LinkedMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_policy(PositionPolicy::default())
    }

    pub fn with_policy(policy: PositionPolicy) -> Self {
        Self::with_policy_and_hasher(policy, RandomState::default())
    }
}

impl<K, V> Default for LinkedMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> LinkedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_policy_and_hasher(policy: PositionPolicy, hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::new(),
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
            policy,
            version: Version::new(),
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn policy(&self) -> PositionPolicy {
        self.policy
    }

    fn find_node<Q>(&self, hash: u64, key: &Q) -> Option<LinkKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.index
            .find(hash, |&k| self.nodes[k].key.borrow() == key)
            .copied()
    }

    /// Append a new key. Fails with `DuplicateKey` when present.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), Error> {
        // probing runs user code (hash/eq); guard that section only
        let hash = {
            let _g = self.reentrancy.enter();
            let hash = self.hasher.hash_one(&key);
            if self.find_node(hash, &key).is_some() {
                return Err(Error::DuplicateKey);
            }
            hash
        };
        self.append_new(hash, key, value);
        Ok(())
    }

    /// Append a new key; returns false (dropping the pair) when present.
    pub fn try_insert(&mut self, key: K, value: V) -> bool {
        self.insert(key, value).is_ok()
    }

    /// Indexer semantics under the configured [`PositionPolicy`]:
    /// overwrite the value for an existing key (repositioning it under
    /// `MoveToEnd`), append for a new one. Returns the replaced value.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let (hash, found) = {
            let _g = self.reentrancy.enter();
            let hash = self.hasher.hash_one(&key);
            (hash, self.find_node(hash, &key))
        };
        match found {
            Some(node) => {
                let old = mem::replace(&mut self.nodes[node].value, value);
                if self.policy == PositionPolicy::MoveToEnd {
                    self.version.bump();
                    self.unlink(node);
                    self.link_back(node);
                }
                Some(old)
            }
            None => {
                self.append_new(hash, key, value);
                None
            }
        }
    }

    fn append_new(&mut self, hash: u64, key: K, value: V) {
        self.version.bump();
        let node = self.nodes.insert(LinkedEntry {
            hash,
            key,
            value,
            prev: None,
            next: None,
        });
        self.index.insert_unique(hash, node, |&k| self.nodes[k].hash);
        self.link_back(node);
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.hasher.hash_one(key);
        self.find_node(hash, key).map(|k| &self.nodes[k].value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.hasher.hash_one(key);
        let node = self.find_node(hash, key)?;
        Some(&mut self.nodes[node].value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.hasher.hash_one(key);
        self.find_node(hash, key).is_some()
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = {
            let _g = self.reentrancy.enter();
            let hash = self.hasher.hash_one(key);
            match self
                .index
                .find_entry(hash, |&k| self.nodes[k].key.borrow() == key)
            {
                Ok(occupied) => occupied.remove().0,
                Err(_) => return None,
            }
        };
        self.version.bump();
        self.unlink(node);
        let entry = self.nodes.remove(node).expect("indexed node must be live");
        Some((entry.key, entry.value))
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.head.map(|k| {
            let e = &self.nodes[k];
            (&e.key, &e.value)
        })
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.tail.map(|k| {
            let e = &self.nodes[k];
            (&e.key, &e.value)
        })
    }

    pub fn clear(&mut self) {
        if !self.nodes.is_empty() {
            self.version.bump();
        }
        self.nodes.clear();
        self.index.clear();
        self.head = None;
        self.tail = None;
    }

    pub fn iter(&self) -> LinkedIter<'_, K, V> {
        LinkedIter {
            nodes: &self.nodes,
            next: self.head,
            remaining: self.nodes.len(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Version-checked stepping cursor; see
    /// [`MapCursor`](crate::MapCursor) for the contract.
    pub fn cursor(&self) -> LinkedCursor {
        LinkedCursor {
            next: self.head,
            version: self.version.snapshot(),
        }
    }

    fn link_back(&mut self, node: LinkKey) {
        self.nodes[node].prev = self.tail;
        self.nodes[node].next = None;
        match self.tail {
            Some(tail) => self.nodes[tail].next = Some(node),
            None => self.head = Some(node),
        }
        self.tail = Some(node);
    }

    fn unlink(&mut self, node: LinkKey) {
        let (prev, next) = (self.nodes[node].prev, self.nodes[node].next);
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
    }
}

pub struct LinkedIter<'a, K, V> {
    nodes: &'a SlotMap<LinkKey, LinkedEntry<K, V>>,
    next: Option<LinkKey>,
    remaining: usize,
}

impl<'a, K, V> Iterator for LinkedIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.next?;
        let entry = &self.nodes[key];
        self.next = entry.next;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for LinkedIter<'_, K, V> {}

/// Version-checked stepping cursor over a [`LinkedMap`].
#[derive(Debug, Clone)]
pub struct LinkedCursor {
    next: Option<LinkKey>,
    version: u64,
}

impl LinkedCursor {
    pub fn move_next<'a, K, V, S>(
        &mut self,
        map: &'a LinkedMap<K, V, S>,
    ) -> Result<Option<(&'a K, &'a V)>, Error>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        if !map.version.matches(self.version) {
            return Err(Error::ConcurrentModification);
        }
        let Some(key) = self.next else {
            return Ok(None);
        };
        let entry = &map.nodes[key];
        self.next = entry.next;
        Ok(Some((&entry.key, &entry.value)))
    }

    pub fn reset<K, V, S>(&mut self, map: &LinkedMap<K, V, S>) -> Result<(), Error>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        if !map.version.matches(self.version) {
            return Err(Error::ConcurrentModification);
        }
        self.next = map.head;
        Ok(())
    }
}

impl<K, V, S> Extend<(K, V)> for LinkedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for LinkedMap<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, Q, S> Index<&Q> for LinkedMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// Panics on an absent key, like the standard map indexers.
    fn index(&self, key: &Q) -> &V {
        self.get(key).unwrap_or_else(|| panic!("{}", Error::KeyNotFound))
    }
}

impl<K, V, S> fmt::Debug for LinkedMap<K, V, S>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Content equality, order-insensitive.
impl<K, V, S> PartialEq for LinkedMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(k, v)| other.get(k).is_some_and(|ov| ov == v))
    }
}

impl<K, V, S> Eq for LinkedMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}
