//! Operation cache for memoizing BDD operations.
//!
//! The cache is backed by `hashbrown::HashMap` keyed through [`MyHash`],
//! so the same key types work here as in the unique tables. Hit/miss
//! counters are kept for diagnostics.

use std::cell::Cell;
use std::hash::{BuildHasherDefault, Hash, Hasher};

use hashbrown::HashMap;

use crate::utils::MyHash;

/// A hasher that passes through a precomputed `MyHash::hash()` value.
#[derive(Default)]
pub struct MyHasher {
    hash: u64,
}

impl Hasher for MyHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    #[inline]
    fn write(&mut self, _bytes: &[u8]) {
        unreachable!("MyHasher only supports write_u64")
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// Wrapper that implements `std::hash::Hash` for any `MyHash` type.
#[derive(Clone, PartialEq, Eq)]
#[repr(transparent)]
struct HashableKey<K>(K);

impl<K: MyHash> Hash for HashableKey<K> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash());
    }
}

/// A memo table for engine operations.
///
/// Entries are never evicted; the engine clears the whole cache on
/// garbage collection, when node identities may be reused.
pub struct OpCache<K, V> {
    map: HashMap<HashableKey<K>, V, BuildHasherDefault<MyHasher>>,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl<K, V> Default for OpCache<K, V> {
    fn default() -> Self {
        Self::new(14)
    }
}

impl<K, V> OpCache<K, V> {
    /// Creates a cache pre-allocated for `2^bits` entries.
    pub fn new(bits: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(1 << bits, BuildHasherDefault::default()),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of cache hits so far.
    pub fn hits(&self) -> usize {
        self.hits.get()
    }

    /// Number of cache misses so far.
    pub fn misses(&self) -> usize {
        self.misses.get()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K, V> OpCache<K, V>
where
    K: MyHash + Eq + Copy,
    V: Copy,
{
    #[inline]
    pub fn get(&self, key: &K) -> Option<V> {
        match self.map.get(&HashableKey(*key)) {
            Some(&v) => {
                self.hits.set(self.hits.get() + 1);
                Some(v)
            }
            None => {
                self.misses.set(self.misses.get() + 1);
                None
            }
        }
    }

    #[inline]
    pub fn insert(&mut self, key: K, value: V) {
        self.map.insert(HashableKey(key), value);
    }
}
