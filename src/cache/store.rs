//! Cache Store Module
//!
//! Byte-bounded cache engine combining HashMap storage with LRU tracking.

use std::collections::HashMap;
use std::fmt;

use crate::cache::{ByteView, LruTracker};

/// Callback invoked with each entry removed by eviction.
pub type EvictionCallback = Box<dyn Fn(&str, &ByteView) + Send + Sync>;

// == LRU Cache ==
/// Key-value storage bounded by the total byte weight of its entries.
///
/// An entry weighs `key.len() + value.len()`. After every insert the least
/// recently used entries are evicted until the total fits the capacity.
/// A capacity of zero disables eviction.
pub struct LruCache {
    /// Key-value storage
    entries: HashMap<String, ByteView>,
    /// LRU access tracker
    lru: LruTracker,
    /// Maximum total weight, 0 = unbounded
    capacity: usize,
    /// Current total weight
    bytes: usize,
    on_evicted: Option<EvictionCallback>,
}

impl LruCache {
    // == Constructor ==
    /// Creates a new cache holding at most `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            capacity,
            bytes: 0,
            on_evicted: None,
        }
    }

    /// Creates a cache that reports each evicted entry to `on_evicted`.
    pub fn with_eviction_callback<F>(capacity: usize, on_evicted: F) -> Self
    where
        F: Fn(&str, &ByteView) + Send + Sync + 'static,
    {
        Self {
            on_evicted: Some(Box::new(on_evicted)),
            ..Self::new(capacity)
        }
    }

    // == Get ==
    /// Looks up a key and marks it as most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<ByteView> {
        let value = self.entries.get(key)?.clone();
        self.lru.touch(key);
        Some(value)
    }

    // == Add ==
    /// Inserts or replaces a value, then evicts until the capacity holds.
    pub fn add(&mut self, key: impl Into<String>, value: ByteView) {
        let key = key.into();
        let added = value.len();

        match self.entries.get_mut(&key) {
            Some(existing) => {
                self.bytes = self.bytes - existing.len() + added;
                *existing = value;
            }
            None => {
                self.bytes += key.len() + added;
                self.entries.insert(key.clone(), value);
            }
        }
        self.lru.touch(&key);

        while self.capacity != 0 && self.bytes > self.capacity {
            if self.remove_oldest().is_none() {
                break;
            }
        }
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry, returning its key.
    pub fn remove_oldest(&mut self) -> Option<String> {
        let key = self.lru.evict_oldest()?;
        if let Some(value) = self.entries.remove(&key) {
            self.bytes -= key.len() + value.len();
            if let Some(callback) = &self.on_evicted {
                callback(&key, &value);
            }
        }
        Some(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the current total weight in bytes.
    pub fn bytes(&self) -> usize {
        self.bytes
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl fmt::Debug for LruCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.entries.len())
            .field("bytes", &self.bytes)
            .field("capacity", &self.capacity)
            .finish()
    }
}
