//! Bounded most-recently-used memo cache

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

pub const DEFAULT_CACHE_CAPACITY: usize = 50;

/// Fixed-capacity map that evicts the least recently used key.
///
/// Recency is a monotonic tick per access; both hits and inserts refresh it.
/// Not synchronized: callers wrap it in their own lock.
#[derive(Debug)]
pub struct MruCache<K, V> {
    capacity: usize,
    tick: u64,
    entries: HashMap<K, (V, u64)>,
    recency: BTreeMap<u64, K>,
}

impl<K, V> MruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// A capacity of zero is treated as one
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            tick: 0,
            entries: HashMap::new(),
            recency: BTreeMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Membership test that does not touch recency
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Look up and refresh
    pub fn get(&mut self, key: &K) -> Option<V> {
        let tick = self.next_tick();
        let (value, stamp) = self.entries.get_mut(key)?;
        self.recency.remove(&*stamp);
        *stamp = tick;
        self.recency.insert(tick, key.clone());
        Some(value.clone())
    }

    /// Insert or replace. Returns the evicted entry, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        let tick = self.next_tick();
        if let Some((_, stamp)) = self.entries.remove(&key) {
            self.recency.remove(&stamp);
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        self.recency.insert(tick, key.clone());
        self.entries.insert(key, (value, tick));
        evicted
    }

    fn evict_oldest(&mut self) -> Option<(K, V)> {
        let (_, key) = self.recency.pop_first()?;
        let (value, _) = self.entries.remove(&key)?;
        Some((key, value))
    }

    /// Return the cached value, computing and inserting it on a miss
    pub fn get_or_insert_with<F>(&mut self, key: &K, compute: F) -> V
    where
        F: FnOnce(&K) -> V,
    {
        if let Some(value) = self.get(key) {
            return value;
        }
        let value = compute(key);
        self.insert(key.clone(), value.clone());
        value
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let (value, stamp) = self.entries.remove(key)?;
        self.recency.remove(&stamp);
        Some(value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }
}

impl<K, V> Default for MruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
