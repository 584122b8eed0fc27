//! Bounded match cache.

use std::collections::VecDeque;
use std::hash::Hash;

use dashmap::DashMap;
use parking_lot::Mutex;

/// A concurrent cache bounded by entry count.
///
/// Reads go straight to the sharded map. Writes record the key in an
/// insertion queue; once `capacity` is exceeded the oldest inserted entry
/// is evicted. Re-inserting an existing key does not refresh its position.
#[derive(Debug)]
pub(crate) struct BoundedCache<K, V>
where
    K: Eq + Hash,
{
    entries: DashMap<K, V>,
    order: Mutex<VecDeque<K>>,
    capacity: usize,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache holding at most `capacity` entries. Zero disables it.
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub(crate) fn insert(&self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(key.clone(), value).is_some() {
            return;
        }
        let mut order = self.order.lock();
        order.push_back(key);
        while order.len() > self.capacity {
            if let Some(oldest) = order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    pub(crate) fn clear(&self) {
        let mut order = self.order.lock();
        order.clear();
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
