//! ChainedHashMap: separate-chaining core with an arena-backed node store.

use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashSet;
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;

/// Bucket count used by `new()`, and the floor that smaller capacity
/// requests are clamped up to.
pub const DEFAULT_CAPACITY: usize = 16;

/// Construction failure: the requested capacity cannot be rounded up to
/// a power of two within `usize`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CapacityError {
    Overflow,
}

/// One chain node. The hash is computed once at insertion and cached;
/// lookups and resizes compare the cached hash before touching `K: Eq`.
#[derive(Debug)]
struct Node<K, V> {
    hash: u64,
    key: K,
    value: V,
    next: Option<DefaultKey>,
}

/// A hash map using separate chaining: a power-of-two bucket array of
/// chain heads, with nodes held in a slotmap arena and linked by key.
///
/// Re-inserting an existing key overwrites its value in place; new keys
/// append at the tail of their bucket's chain, so chain order is
/// insertion order within a bucket. The table doubles when the load
/// factor exceeds 3/4 and never shrinks.
pub struct ChainedHashMap<K, V, S = RandomState> {
    hasher: S,
    buckets: Vec<Option<DefaultKey>>, // length is always a power of two
    nodes: SlotMap<DefaultKey, Node<K, V>>,
    len: usize,
}

// Requests at or below the default clamp up; anything larger rounds up
// to the next power of two so masking stays valid.
fn round_capacity(requested: usize) -> Result<usize, CapacityError> {
    if requested <= DEFAULT_CAPACITY {
        return Ok(DEFAULT_CAPACITY);
    }
    requested
        .checked_next_power_of_two()
        .ok_or(CapacityError::Overflow)
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    /// Empty map with the default capacity and hasher.
    pub fn new() -> Self {
        Self::with_hasher(RandomState::default())
    }

    /// Empty map whose bucket array starts at `capacity`, clamped up to
    /// the default and rounded up to a power of two.
    pub fn with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        Self::with_capacity_and_hasher(capacity, RandomState::default())
    }
}

impl<K, V> Default for ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(DEFAULT_CAPACITY, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self, CapacityError> {
        Ok(Self::from_parts(round_capacity(capacity)?, hasher))
    }

    fn from_parts(capacity: usize, hasher: S) -> Self {
        debug_assert!(capacity.is_power_of_two());
        Self {
            hasher,
            buckets: vec![None; capacity],
            nodes: SlotMap::with_key(),
            len: 0,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current bucket-array length. Always a power of two; grows by
    /// doubling and never shrinks.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_index(&self, hash: u64) -> usize {
        // Low bits of the hash, unmixed. See the crate docs on low-bit
        // entropy and clustering.
        (hash as usize) & (self.buckets.len() - 1)
    }

    fn needs_grow(&self) -> bool {
        // len / capacity > 3/4, without floating point.
        self.len * 4 > self.buckets.len() * 3
    }

    /// Inserts `key -> value`. Returns the previous value if the key was
    /// already present (the node's value is overwritten in place and the
    /// entry count is unchanged); `None` for a new key.
    ///
    /// The load factor is checked against the pre-insertion count, so a
    /// grow can trigger even when the insert turns out to be an update.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.needs_grow() {
            self.grow();
        }
        let hash = self.hasher.hash_one(&key);
        let node = self.nodes.insert(Node {
            hash,
            key,
            value,
            next: None,
        });
        self.place_node(node)
    }

    // Single-node placement shared by insert and grow: walk the chain
    // for the node's bucket comparing cached hash then key equality; on
    // a match move the fresh value into the existing node and free the
    // new one, otherwise append the new node at the chain tail.
    fn place_node(&mut self, node: DefaultKey) -> Option<V> {
        let hash = self.nodes[node].hash;
        let idx = self.bucket_index(hash);
        let Some(head) = self.buckets[idx] else {
            self.buckets[idx] = Some(node);
            self.len += 1;
            return None;
        };
        let mut cur = head;
        loop {
            if self.nodes[cur].hash == hash && self.nodes[cur].key == self.nodes[node].key {
                let fresh = self.nodes.remove(node).unwrap();
                let old = core::mem::replace(&mut self.nodes[cur].value, fresh.value);
                return Some(old);
            }
            match self.nodes[cur].next {
                Some(next) => cur = next,
                None => {
                    self.nodes[cur].next = Some(node);
                    self.len += 1;
                    return None;
                }
            }
        }
    }

    // Double the bucket array and re-place every node, bucket order then
    // chain order, through the same placement routine insert uses. Keys
    // are unique, so placement can never hit the overwrite branch.
    fn grow(&mut self) {
        let doubled = self.buckets.len() * 2;
        let old = core::mem::replace(&mut self.buckets, vec![None; doubled]);
        self.len = 0;
        for head in old {
            let mut cur = head;
            while let Some(node) = cur {
                cur = self.nodes[node].next.take();
                let evicted = self.place_node(node);
                debug_assert!(evicted.is_none(), "duplicate key during grow");
            }
        }
    }

    fn find_node<Q>(&self, key: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hasher.hash_one(key);
        let mut cur = self.buckets[self.bucket_index(hash)];
        while let Some(node) = cur {
            let n = &self.nodes[node];
            if n.hash == hash && n.key.borrow() == key {
                return Some(node);
            }
            cur = n.next;
        }
        None
    }

    /// Value for `key`, or `None` if absent. Absence is not an error.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_node(key).map(|node| &self.nodes[node].value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.find_node(key)?;
        Some(&mut self.nodes[node].value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_node(key).is_some()
    }

    /// Whether any entry's value equals `value`. Linear scan over every
    /// chain; there is no value index.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.iter().any(|(_, v)| v == value)
    }

    /// Removes `key`'s entry and returns its value. Removing an absent
    /// key is a no-op returning `None`.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hasher.hash_one(key);
        let idx = self.bucket_index(hash);
        let head = self.buckets[idx]?;

        // Head match: the bucket slot takes over the head's successor.
        {
            let n = &self.nodes[head];
            if n.hash == hash && n.key.borrow() == key {
                let node = self.nodes.remove(head).unwrap();
                self.buckets[idx] = node.next;
                self.len -= 1;
                return Some(node.value);
            }
        }

        // Otherwise walk (prev, cur) pairs and splice cur out on match.
        let mut prev = head;
        while let Some(cur) = self.nodes[prev].next {
            let n = &self.nodes[cur];
            if n.hash == hash && n.key.borrow() == key {
                let node = self.nodes.remove(cur).unwrap();
                self.nodes[prev].next = node.next;
                self.len -= 1;
                return Some(node.value);
            }
            prev = cur;
        }
        None
    }

    /// Drops every entry. The bucket array keeps its current length.
    pub fn clear(&mut self) {
        if self.len == 0 {
            return;
        }
        self.len = 0;
        self.nodes.clear();
        for slot in &mut self.buckets {
            *slot = None;
        }
    }

    /// Borrowing walk over all entries, bucket order then chain order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            buckets: self.buckets.iter(),
            cur: None,
        }
    }

    /// Snapshot of all entries as owned pairs. Unique by key (a map
    /// invariant), so pair equality makes this a set of entries. The
    /// copy is independent: later map mutation does not affect it.
    pub fn entries(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Snapshot of all keys, projected from the same walk as
    /// `entries()`. Set-typed since map keys are unique.
    pub fn keys(&self) -> HashSet<K, S>
    where
        K: Clone,
    {
        let mut set = HashSet::with_capacity_and_hasher(self.len, self.hasher.clone());
        set.extend(self.iter().map(|(k, _)| k.clone()));
        set
    }

    /// Snapshot of all values; may contain duplicates.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.iter().map(|(_, v)| v.clone()).collect()
    }
}

/// Iterator over `(&K, &V)` in bucket order, then chain order within
/// each bucket.
pub struct Iter<'a, K, V> {
    nodes: &'a SlotMap<DefaultKey, Node<K, V>>,
    buckets: core::slice::Iter<'a, Option<DefaultKey>>,
    cur: Option<DefaultKey>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.cur {
                let n = &self.nodes[node];
                self.cur = n.next;
                return Some((&n.key, &n.value));
            }
            self.cur = *self.buckets.next()?;
        }
    }
}
