//! Utility functions and traits for `ChainedHashMap`

use std::hash::{BuildHasher, Hash};

use crate::ChainedHashMap;

/// Extension trait for map implementations that provides additional utility methods
pub trait HashMapExtensions<K, V> {
    /// Returns the keys of the hash map as a Vec
    fn keys(&self) -> Vec<K>;

    /// Returns the values of the hash map as a Vec
    fn values(&self) -> Vec<V>;

    /// Returns the length of the longest collision chain
    fn longest_chain(&self) -> usize;
}

impl<K, V, S> HashMapExtensions<K, V> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn keys(&self) -> Vec<K> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    fn longest_chain(&self) -> usize {
        self.chain_lengths().into_iter().max().unwrap_or(0)
    }
}

/// Creates a `ChainedHashMap` with default parameters from an iterator of key-value pairs
pub fn from_iter<K, V, I>(iter: I) -> ChainedHashMap<K, V>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, V)>,
{
    iter.into_iter().collect()
}
