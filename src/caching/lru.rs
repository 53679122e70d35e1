//! Least recently used key-value store.

use log::debug;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Key-value store of bounded capacity, evicting the least recently used
/// entry when full.
pub struct Lru<K, V> {
    /// Underlying store.
    map: HashMap<K, Entry<V>>,
    /// Maximum capacity of the store.
    capacity: usize,
    /// Timestamp of the last access.
    clock: u64,
}

/// Entry, associating a value with the time it was last used.
struct Entry<V> {
    /// Timestamp of the last access.
    last_used: u64,
    /// Value.
    value: V,
}

impl<K, V> Lru<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Creates a store with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
            capacity,
            clock: 0,
        }
    }

    /// Returns the number of entries in the store.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Obtains the value for the given key, making it the most recently used.
    pub fn get(&mut self, k: &K) -> Option<&V> {
        self.clock += 1;
        let clock = self.clock;
        match self.map.get_mut(k) {
            Some(entry) => {
                entry.last_used = clock;
                Some(&entry.value)
            }
            None => None,
        }
    }

    /// Inserts the given value in the store, replacing any previous value for
    /// this key.
    ///
    /// Returns the evicted key, if the store was full.
    pub fn put(&mut self, k: K, value: V) -> Option<K> {
        self.clock += 1;
        let entry = Entry {
            last_used: self.clock,
            value,
        };

        if self.map.contains_key(&k) {
            self.map.insert(k, entry);
            return None;
        }

        let evicted = if self.map.len() == self.capacity {
            self.evict()
        } else {
            None
        };
        self.map.insert(k, entry);
        evicted
    }

    /// Evicts the least recently used entry, returning its key.
    fn evict(&mut self) -> Option<K> {
        let oldest_key = self
            .map
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(k, _)| k.clone())?;
        debug!("Evicting {oldest_key:?}");
        self.map.remove(&oldest_key);
        Some(oldest_key)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn put_and_get() {
        let mut lru = Lru::with_capacity(4);
        assert_eq!(lru.get(&"a"), None);
        assert_eq!(lru.put("a", 1), None);
        assert_eq!(lru.get(&"a"), Some(&1));
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn put_replaces_value() {
        let mut lru = Lru::with_capacity(2);
        lru.put("a", 1);
        lru.put("a", 2);
        assert_eq!(lru.get(&"a"), Some(&2));
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut lru = Lru::with_capacity(2);
        lru.put("a", 1);
        lru.put("b", 2);
        assert_eq!(lru.put("c", 3), Some("a"));
        assert_eq!(lru.get(&"a"), None);
        assert_eq!(lru.get(&"b"), Some(&2));
        assert_eq!(lru.get(&"c"), Some(&3));
    }

    #[test]
    fn get_refreshes_recency() {
        let mut lru = Lru::with_capacity(2);
        lru.put("a", 1);
        lru.put("b", 2);
        assert_eq!(lru.get(&"a"), Some(&1));
        // "b" is now the least recently used entry.
        assert_eq!(lru.put("c", 3), Some("b"));
        assert_eq!(lru.get(&"a"), Some(&1));
    }
}
