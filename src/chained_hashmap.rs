use std::{
    borrow::Borrow,
    collections::hash_map::RandomState,
    fmt,
    hash::{BuildHasher, Hash},
    iter, mem, slice,
};

use crate::error::MapError;

/// Head of a collision chain; `None` marks an empty bucket or the end of a chain
type Link<K, V> = Option<Box<Node<K, V>>>;

/// An entry in a bucket's singly linked chain
#[derive(Debug)]
struct Node<K, V> {
    /// The key in the key-value pair
    key: K,
    /// The value associated with the key
    value: V,
    /// The next entry that hashed to the same bucket
    next: Link<K, V>,
}

/// A hash table that resolves collisions with separate chaining.
///
/// Each bucket holds a singly linked chain of entries. New keys are prepended to the
/// chain of bucket `hash(key) mod capacity`. Once `len / capacity` reaches the load factor
/// threshold the bucket array is doubled and every entry is relinked into its new bucket.
///
/// Note: This implementation is not thread-safe.
pub struct ChainedHashMap<K, V, S = RandomState> {
    /// Chain heads, one per bucket; the length of this vector is the capacity
    buckets: Vec<Link<K, V>>,
    /// Number of stored entries
    count: usize,
    /// Ratio of entries to buckets that triggers growth, in `(0, 1]`
    load_factor_threshold: f64,
    /// Builds the hasher used for every key
    hash_builder: S,
}

impl<K, V> ChainedHashMap<K, V, RandomState> {
    /// Number of buckets used by [`ChainedHashMap::new`]
    pub const DEFAULT_CAPACITY: usize = 16;
    /// Load factor threshold used by [`ChainedHashMap::new`]
    pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

    /// Creates an empty map with the default capacity and load factor
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Creates an empty map with `capacity` buckets that grows once
    /// `len / capacity >= load_factor`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidArgument`] if `capacity` is zero or `load_factor` is not in
    /// `(0, 1]`.
    pub fn with_capacity_and_load_factor(
        capacity: usize,
        load_factor: f64,
    ) -> Result<Self, MapError> {
        Self::with_capacity_and_hasher(capacity, load_factor, RandomState::new())
    }
}

impl<K, V, S> ChainedHashMap<K, V, S> {
    /// Creates an empty map with the default parameters that hashes keys with `hash_builder`
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::from_parts(
            ChainedHashMap::<K, V>::DEFAULT_CAPACITY,
            ChainedHashMap::<K, V>::DEFAULT_LOAD_FACTOR,
            hash_builder,
        )
    }

    /// Creates an empty map with explicit capacity, load factor and hasher.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidArgument`] if `capacity` is zero or `load_factor` is not in
    /// `(0, 1]`.
    pub fn with_capacity_and_hasher(
        capacity: usize,
        load_factor: f64,
        hash_builder: S,
    ) -> Result<Self, MapError> {
        check_parameters(capacity, load_factor)?;
        Ok(Self::from_parts(capacity, load_factor, hash_builder))
    }

    /// Assembles a map from parameters that are already known to be valid
    fn from_parts(capacity: usize, load_factor_threshold: f64, hash_builder: S) -> Self {
        Self {
            buckets: empty_buckets(capacity),
            count: 0,
            load_factor_threshold,
            hash_builder,
        }
    }

    /// Returns the number of entries in the map
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns the number of entries in the map; alias of [`ChainedHashMap::len`]
    #[must_use]
    pub fn size(&self) -> usize {
        self.count
    }

    /// Returns true if the map holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the current ratio of entries to buckets
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.buckets.len() as f64
    }

    /// Returns the ratio at which the map grows
    #[must_use]
    pub fn load_factor_threshold(&self) -> f64 {
        self.load_factor_threshold
    }

    /// Returns the hasher builder used by the map
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes every entry; the capacity is kept
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            unlink_chain(bucket.take());
        }
        self.count = 0;
    }

    /// Returns the length of every bucket's chain, in bucket order
    #[must_use]
    pub fn chain_lengths(&self) -> Vec<usize> {
        self.buckets
            .iter()
            .map(|bucket| {
                let mut len: usize = 0;
                let mut cursor = bucket.as_deref();
                while let Some(node) = cursor {
                    len = len.saturating_add(1);
                    cursor = node.next.as_deref();
                }
                len
            })
            .collect()
    }

    /// Returns an iterator over the entries in bucket order, each chain head to tail
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { buckets: self.buckets.iter(), current: None, remaining: self.count }
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Computes the bucket of `key` for the current capacity
    fn bucket_index<Q: Hash + ?Sized>(&self, key: &Q) -> usize {
        index_for(self.hash_builder.hash_one(key), self.buckets.len())
    }

    /// Inserts `value` under `key`, returning the previous value if the key was present.
    ///
    /// An existing entry is updated in place; only a new key adds an entry and may grow
    /// the table.
    #[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let index = self.bucket_index(&key);

        // index < capacity by construction of `bucket_index`
        let mut cursor = self.buckets[index].as_deref_mut();
        while let Some(node) = cursor {
            if node.key == key {
                return Some(mem::replace(&mut node.value, value));
            }
            cursor = node.next.as_deref_mut();
        }

        let next = self.buckets[index].take();
        self.buckets[index] = Some(Box::new(Node { key, value, next }));
        self.count += 1;

        if self.load_factor() >= self.load_factor_threshold {
            self.grow();
        }
        None
    }

    /// Like [`ChainedHashMap::put`] for callers whose key may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidArgument`] when `key` is `None`; the map is left untouched.
    pub fn try_put(&mut self, key: Option<K>, value: V) -> Result<Option<V>, MapError> {
        let key = key.ok_or_else(|| MapError::InvalidArgument("key must be present".to_owned()))?;
        Ok(self.put(key, value))
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if no entry matches.
    pub fn get<Q>(&self, key: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut cursor = self.buckets.get(self.bucket_index(key)).and_then(Option::as_deref);
        while let Some(node) = cursor {
            if node.key.borrow() == key {
                return Ok(&node.value);
            }
            cursor = node.next.as_deref();
        }
        Err(MapError::KeyNotFound)
    }

    /// Returns a mutable reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if no entry matches.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V, MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        let mut cursor = self.buckets.get_mut(index).and_then(Option::as_deref_mut);
        while let Some(node) = cursor {
            if node.key.borrow() == key {
                return Ok(&mut node.value);
            }
            cursor = node.next.as_deref_mut();
        }
        Err(MapError::KeyNotFound)
    }

    /// Returns true if the map holds an entry for `key`
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_ok()
    }

    /// Removes the entry for `key` and returns its value, or `None` if the key is absent
    #[allow(clippy::arithmetic_side_effects)]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);

        // `link` is the predecessor's `next` field, or the bucket head for the first node
        let mut link = self.buckets.get_mut(index)?;
        while link.as_ref().is_some_and(|node| node.key.borrow() != key) {
            link = &mut link.as_mut()?.next;
        }

        let removed = link.take()?;
        let Node { value, next, .. } = *removed;
        *link = next;
        self.count -= 1;
        Some(value)
    }

    /// Like [`ChainedHashMap::remove`] for callers whose key may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidArgument`] when `key` is `None`; the map is left untouched.
    pub fn try_remove<Q>(&mut self, key: Option<&Q>) -> Result<Option<V>, MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let key = key.ok_or_else(|| MapError::InvalidArgument("key must be present".to_owned()))?;
        Ok(self.remove(key))
    }

    /// Doubles the bucket array until the load factor drops below the threshold
    #[allow(clippy::cast_precision_loss)]
    fn grow(&mut self) {
        let mut new_capacity = self.buckets.len();
        loop {
            new_capacity = new_capacity.saturating_mul(2);
            let ratio = self.count as f64 / new_capacity as f64;
            if ratio < self.load_factor_threshold || new_capacity == usize::MAX {
                break;
            }
        }
        self.rehash(new_capacity);
    }

    /// Relinks every node into a fresh bucket array of `new_capacity` buckets
    #[allow(clippy::indexing_slicing)]
    fn rehash(&mut self, new_capacity: usize) {
        let old_buckets = mem::replace(&mut self.buckets, empty_buckets(new_capacity));

        for mut link in old_buckets {
            while let Some(mut node) = link {
                link = node.next.take();
                // index < new_capacity by construction of `bucket_index`
                let index = self.bucket_index(&node.key);
                node.next = self.buckets[index].take();
                self.buckets[index] = Some(node);
            }
        }
    }
}

impl<K, V> Default for ChainedHashMap<K, V, RandomState> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ChainedHashMap<K, V, RandomState>
where
    K: Hash + Eq,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for ChainedHashMap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.iter().map(clone_chain).collect(),
            count: self.count,
            load_factor_threshold: self.load_factor_threshold,
            hash_builder: self.hash_builder.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ChainedHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Drop for ChainedHashMap<K, V, S> {
    fn drop(&mut self) {
        // Unlink iteratively so a long chain does not recurse through `Box` drops
        for bucket in &mut self.buckets {
            unlink_chain(bucket.take());
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Rejects a zero capacity and load factors outside `(0, 1]`
pub(crate) fn check_parameters(capacity: usize, load_factor: f64) -> Result<(), MapError> {
    if capacity == 0 {
        return Err(MapError::InvalidArgument("initial capacity must be positive".to_owned()));
    }
    if load_factor.is_nan() || load_factor <= 0.0 || load_factor > 1.0 {
        return Err(MapError::InvalidArgument(format!(
            "load factor must lie in (0, 1], got {load_factor}"
        )));
    }
    Ok(())
}

/// Maps a 64-bit hash onto `[0, capacity)`.
///
/// The hash is reduced as an unsigned bit pattern, so a hash whose signed reading is the
/// minimum integer still lands inside the table.
#[allow(clippy::cast_possible_truncation)]
fn index_for(hash: u64, capacity: usize) -> usize {
    // The remainder is below `capacity`, so narrowing back to `usize` is lossless
    hash.checked_rem(capacity as u64).map_or(0, |index| index as usize)
}

/// Allocates `capacity` empty buckets
fn empty_buckets<K, V>(capacity: usize) -> Vec<Link<K, V>> {
    iter::repeat_with(|| None).take(capacity).collect()
}

/// Drops a chain node by node
fn unlink_chain<K, V>(mut link: Link<K, V>) {
    while let Some(mut node) = link {
        link = node.next.take();
    }
}

/// Deep-copies a chain, preserving node order
fn clone_chain<K: Clone, V: Clone>(link: &Link<K, V>) -> Link<K, V> {
    let mut nodes = Vec::new();
    let mut cursor = link.as_deref();
    while let Some(node) = cursor {
        nodes.push(node);
        cursor = node.next.as_deref();
    }
    nodes.into_iter().rev().fold(None, |next, node| {
        Some(Box::new(Node { key: node.key.clone(), value: node.value.clone(), next }))
    })
}

/// Iterator over the key-value pairs of the hash table
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    /// Buckets not yet visited
    buckets: slice::Iter<'a, Link<K, V>>,
    /// Next node in the chain being walked
    current: Option<&'a Node<K, V>>,
    /// Entries not yet yielded
    remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self { buckets: self.buckets.clone(), current: self.current, remaining: self.remaining }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.current.take() {
                self.current = node.next.as_deref();
                self.remaining = self.remaining.saturating_sub(1);
                return Some((&node.key, &node.value));
            }
            self.current = self.buckets.next()?.as_deref();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, hash::Hasher};

    use proptest::prelude::*;

    use super::*;

    /// Hashes integers to themselves so tests control bucket placement
    #[derive(Debug, Clone, Copy, Default)]
    struct IdentityState;

    #[derive(Debug, Default)]
    struct IdentityHasher(u64);

    impl BuildHasher for IdentityState {
        type Hasher = IdentityHasher;

        fn build_hasher(&self) -> IdentityHasher {
            IdentityHasher::default()
        }
    }

    impl Hasher for IdentityHasher {
        fn finish(&self) -> u64 {
            self.0
        }

        fn write(&mut self, bytes: &[u8]) {
            for &byte in bytes {
                self.0 = (self.0 << 8) | u64::from(byte);
            }
        }

        fn write_i32(&mut self, n: i32) {
            self.0 = i64::from(n) as u64;
        }

        fn write_i64(&mut self, n: i64) {
            self.0 = n as u64;
        }

        fn write_u64(&mut self, n: u64) {
            self.0 = n;
        }

        fn write_usize(&mut self, n: usize) {
            self.0 = n as u64;
        }
    }

    fn chain_len<K, V, S>(map: &ChainedHashMap<K, V, S>, index: usize) -> usize {
        map.chain_lengths()[index]
    }

    fn identity_map<K, V>(capacity: usize, load_factor: f64) -> ChainedHashMap<K, V, IdentityState> {
        ChainedHashMap::with_capacity_and_hasher(capacity, load_factor, IdentityState).unwrap()
    }

    #[test]
    fn test_put_and_get() {
        let mut map = ChainedHashMap::new();
        assert_eq!(map.put("key1".to_string(), 1), None);
        assert_eq!(map.put("key2".to_string(), 2), None);
        assert_eq!(map.put("key3".to_string(), 3), None);

        assert_eq!(map.get("key1"), Ok(&1));
        assert_eq!(map.get("key2"), Ok(&2));
        assert_eq!(map.get("key3"), Ok(&3));
        assert_eq!(map.get("key4"), Err(MapError::KeyNotFound));
        assert_eq!(map.size(), 3);
    }

    #[test]
    fn test_update_keeps_single_entry() {
        let mut map = identity_map(8, 0.75);
        assert_eq!(map.put(5_i64, "a"), None);
        assert_eq!(map.put(5, "b"), Some("a"));
        assert_eq!(map.put(5, "c"), Some("b"));

        assert_eq!(map.get(&5), Ok(&"c"));
        assert_eq!(map.len(), 1);
        assert_eq!(chain_len(&map, 5), 1);
    }

    #[test]
    fn test_put_get_remove_scenario() {
        let mut map = ChainedHashMap::with_capacity_and_load_factor(10, 0.75).unwrap();
        map.put(8, "tyrj".to_string());

        assert_eq!(map.get(&8).map(String::as_str), Ok("tyrj"));
        assert_eq!(map.remove(&8).as_deref(), Some("tyrj"));
        assert_eq!(map.get(&8), Err(MapError::KeyNotFound));
        assert!(map.is_empty());
    }

    #[test]
    fn test_growth_scenario() {
        let mut map = ChainedHashMap::with_capacity_and_load_factor(3, 0.75).unwrap();
        map.put(1, "one");
        map.put(17, "seventeen");
        assert_eq!(map.capacity(), 3);

        // 3 / 3 >= 0.75
        map.put(3, "three");
        assert_eq!(map.size(), 3);
        assert_eq!(map.capacity(), 6);
        assert_eq!(map.get(&1), Ok(&"one"));
        assert_eq!(map.get(&17), Ok(&"seventeen"));
        assert_eq!(map.get(&3), Ok(&"three"));
    }

    #[test]
    fn test_growth_doubles_capacity() {
        let mut map = identity_map(4, 0.5);
        map.put(1_i64, 1);
        assert_eq!(map.capacity(), 4);
        map.put(2, 2);
        assert_eq!(map.capacity(), 8);
        map.put(3, 3);
        map.put(4, 4);
        assert_eq!(map.capacity(), 16);
    }

    #[test]
    fn test_growth_repeats_for_small_thresholds() {
        let mut map = identity_map(1, 0.1);
        map.put(7_i64, ());
        // Each ratio down to 1/8 is still at or above 0.1
        assert_eq!(map.capacity(), 16);
        assert!(map.load_factor() < map.load_factor_threshold());
    }

    #[test]
    fn test_load_factor_stays_below_threshold() {
        let mut map = ChainedHashMap::with_capacity_and_load_factor(10, 0.75).unwrap();
        for i in 0..1_000 {
            map.put(i, i * 2);
            assert!(map.load_factor() < map.load_factor_threshold());
        }
        for i in 0..1_000 {
            assert_eq!(map.get(&i), Ok(&(i * 2)));
        }
    }

    #[test]
    fn test_collisions_share_a_chain() {
        let mut map = identity_map(8, 1.0);
        map.put(0_i64, "zero");
        map.put(8, "eight");
        map.put(16, "sixteen");
        assert_eq!(chain_len(&map, 0), 3);

        // Middle of the chain
        assert_eq!(map.remove(&8), Some("eight"));
        assert_eq!(chain_len(&map, 0), 2);
        assert_eq!(map.get(&0), Ok(&"zero"));
        assert_eq!(map.get(&16), Ok(&"sixteen"));

        // Head of the chain is the most recent insertion
        assert_eq!(map.remove(&16), Some("sixteen"));
        assert_eq!(map.remove(&0), Some("zero"));
        assert_eq!(chain_len(&map, 0), 0);
        assert!(map.is_empty());
    }

    #[test]
    fn test_rehash_splits_chains() {
        let mut map = identity_map(4, 1.0);
        map.put(0_i64, 'a');
        map.put(4, 'b');
        map.put(8, 'c');
        assert_eq!(chain_len(&map, 0), 3);

        // Fourth entry reaches 4 / 4 and doubles to eight buckets
        map.put(1, 'd');
        assert_eq!(map.capacity(), 8);
        assert_eq!(chain_len(&map, 0), 2);
        assert_eq!(chain_len(&map, 4), 1);
        assert_eq!(chain_len(&map, 1), 1);
        for (k, v) in [(0, 'a'), (4, 'b'), (8, 'c'), (1, 'd')] {
            assert_eq!(map.get(&k), Ok(&v));
        }
    }

    #[test]
    fn test_minimum_integer_hash() {
        let mut map = identity_map(7, 0.75);
        map.put(i64::MIN, "min");
        map.put(i64::MAX, "max");
        map.put(-1, "minus one");

        assert_eq!(map.get(&i64::MIN), Ok(&"min"));
        assert_eq!(map.get(&i64::MAX), Ok(&"max"));
        assert_eq!(map.get(&-1), Ok(&"minus one"));
        assert_eq!(map.remove(&i64::MIN), Some("min"));
    }

    #[test]
    fn test_index_for_stays_in_range() {
        for capacity in [1, 2, 3, 7, 10, 1 << 20] {
            for hash in [0, 1, u64::MAX, 1 << 63, (1 << 63) - 1] {
                assert!(index_for(hash, capacity) < capacity);
            }
        }
    }

    #[test]
    fn test_remove_absent_key() {
        let mut map = ChainedHashMap::new();
        map.put(1, 1);
        assert_eq!(map.remove(&2), None);
        assert_eq!(map.size(), 1);
        assert_eq!(map.remove(&1), Some(1));
        assert_eq!(map.remove(&1), None);
        assert_eq!(map.size(), 0);
    }

    #[test]
    fn test_absent_keys_are_rejected() {
        let mut map: ChainedHashMap<i32, i32> = ChainedHashMap::new();
        map.put(1, 10);

        assert!(matches!(map.try_put(None, 5), Err(MapError::InvalidArgument(_))));
        assert!(matches!(map.try_remove::<i32>(None), Err(MapError::InvalidArgument(_))));
        assert_eq!(map.size(), 1);

        assert_eq!(map.try_put(Some(1), 11), Ok(Some(10)));
        assert_eq!(map.try_remove(Some(&1)), Ok(Some(11)));
    }

    #[test]
    fn test_invalid_construction() {
        let zero = ChainedHashMap::<i32, i32>::with_capacity_and_load_factor(0, 0.75);
        assert!(matches!(zero, Err(MapError::InvalidArgument(_))));

        for load_factor in [0.0, -0.5, 1.5, f64::NAN, f64::INFINITY] {
            let map = ChainedHashMap::<i32, i32>::with_capacity_and_load_factor(4, load_factor);
            assert!(matches!(map, Err(MapError::InvalidArgument(_))), "{load_factor}");
        }

        assert!(ChainedHashMap::<i32, i32>::with_capacity_and_load_factor(1, 1.0).is_ok());
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut map = ChainedHashMap::with_capacity_and_load_factor(4, 0.75).unwrap();
        for i in 0..10 {
            map.put(i, i);
        }
        let capacity = map.capacity();

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.size(), 0);
        assert_eq!(map.capacity(), capacity);
        assert_eq!(map.get(&3), Err(MapError::KeyNotFound));

        map.put(3, 30);
        assert_eq!(map.get(&3), Ok(&30));
        assert_eq!(map.capacity(), capacity);
    }

    #[test]
    fn test_get_mut() {
        let mut map = ChainedHashMap::new();
        map.put("key1".to_string(), 1);

        if let Ok(value) = map.get_mut("key1") {
            *value += 10;
        }

        assert_eq!(map.get("key1"), Ok(&11));
        assert_eq!(map.get_mut("key2"), Err(MapError::KeyNotFound));
    }

    #[test]
    fn test_iter_and_clone() {
        let map: ChainedHashMap<i32, i32> = (0..50).map(|i| (i, i * i)).collect();
        assert_eq!(map.iter().len(), 50);

        let copy = map.clone();
        let mut pairs: Vec<_> = copy.iter().map(|(&k, &v)| (k, v)).collect();
        pairs.sort_unstable();
        assert_eq!(pairs, (0..50).map(|i| (i, i * i)).collect::<Vec<_>>());

        let sum: i32 = (&map).into_iter().map(|(_, v)| *v).sum();
        assert_eq!(sum, (0..50).map(|i| i * i).sum());
    }

    #[test]
    fn test_long_chain_drop() {
        let mut map = identity_map(1, 1.0);
        // Every key is a multiple of every capacity reached, so all land in bucket 0
        for i in 0..10_000_u64 {
            map.put(i << 40, ());
        }
        assert_eq!(map.len(), 10_000);
        assert_eq!(chain_len(&map, 0), 10_000);
        drop(map);
    }

    #[test]
    fn test_debug_output() {
        let mut map = ChainedHashMap::new();
        map.put(1, "a");
        assert_eq!(format!("{map:?}"), r#"{1: "a"}"#);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Put(u8, u32),
        Remove(u8),
        Clear,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (any::<u8>(), any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
            3 => any::<u8>().prop_map(Op::Remove),
            1 => Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn prop_matches_std_hashmap(
            capacity in 1usize..32,
            load_factor in 0.05f64..=1.0,
            ops in proptest::collection::vec(op_strategy(), 1..300),
        ) {
            let mut map = ChainedHashMap::with_capacity_and_load_factor(capacity, load_factor).unwrap();
            let mut model = HashMap::new();

            for op in ops {
                match op {
                    Op::Put(k, v) => prop_assert_eq!(map.put(k, v), model.insert(k, v)),
                    Op::Remove(k) => prop_assert_eq!(map.remove(&k), model.remove(&k)),
                    Op::Clear => {
                        map.clear();
                        model.clear();
                    }
                }
                prop_assert_eq!(map.size(), model.len());
                prop_assert!(map.load_factor() < map.load_factor_threshold());
            }

            for k in 0..=u8::MAX {
                match model.get(&k) {
                    Some(v) => prop_assert_eq!(map.get(&k), Ok(v)),
                    None => prop_assert_eq!(map.get(&k), Err(MapError::KeyNotFound)),
                }
            }
        }

        #[test]
        fn prop_growth_keeps_every_key(keys in proptest::collection::hash_set(any::<i64>(), 0..500)) {
            let mut map = ChainedHashMap::with_capacity_and_load_factor(3, 0.75).unwrap();
            for &k in &keys {
                let before = map.capacity();
                map.put(k, k.wrapping_mul(3));
                let after = map.capacity();
                prop_assert!(after == before || after == before * 2);
            }
            prop_assert_eq!(map.size(), keys.len());
            for &k in &keys {
                prop_assert_eq!(map.get(&k), Ok(&k.wrapping_mul(3)));
            }
        }
    }
}
