//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL
//! expiration. Expiry is enforced lazily on every read, so correctness never
//! depends on the background sweeper having run.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;

// == TTL Cache ==
/// Bounded key-value store with per-entry expiry and LRU eviction.
///
/// Values are owned by the cache once stored; `get` hands back a clone.
/// Capacity of at least 1 is assumed. None of the operations fail.
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL for entries stored without an explicit TTL
    default_ttl: Duration,
    /// Time source for expiry decisions
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    // == Constructors ==
    /// Creates a cache using the wall clock.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a cache reading time from `clock`. Tests pass a
    /// [`ManualClock`](crate::clock::ManualClock) here.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: config.max_entries,
            default_ttl: config.default_ttl,
            clock,
        }
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL, returning `&mut Self` so
    /// calls can be chained.
    ///
    /// Overwriting an existing key resets its TTL and recency without
    /// evicting anything. Inserting a new key into a full cache first evicts
    /// the least recently used entry.
    pub fn set(&mut self, key: String, value: V, ttl: Option<Duration>) -> &mut Self {
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(evicted_key) = self.lru.pop_oldest() {
                self.entries.remove(&evicted_key);
                self.stats.record_eviction();
                tracing::debug!(key = %evicted_key, "evicted least recently used entry");
            }
        }

        let now_ms = self.clock.now_ms();
        let entry = CacheEntry::new(value, now_ms, ttl.unwrap_or(self.default_ttl));
        self.entries.insert(key.clone(), entry);

        // Insertion counts as an access
        self.lru.touch(&key);
        self.stats.set_size(self.entries.len());

        self
    }

    // == Get ==
    /// Retrieves a clone of the value if the key is present and not expired.
    ///
    /// A live read counts as a hit and promotes the key to most recently
    /// used. A missing or expired key counts as a miss; expired entries are
    /// dropped on the spot.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now_ms = self.clock.now_ms();

        match self.entries.get(key) {
            Some(entry) if entry.is_expired(now_ms) => {
                self.entries.remove(key);
                self.lru.remove(key);
                self.stats.set_size(self.entries.len());
                self.stats.record_miss();
                None
            }
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                self.lru.touch(key);
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Has ==
    /// Checks whether a live (non-expired) entry exists for `key`.
    ///
    /// Does not promote the key and does not count toward hit/miss
    /// statistics.
    pub fn has(&self, key: &str) -> bool {
        let now_ms = self.clock.now_ms();
        self.entries
            .get(key)
            .map(|entry| !entry.is_expired(now_ms))
            .unwrap_or(false)
    }

    // == Delete ==
    /// Removes an entry. Idempotent; returns whether a removal happened.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            self.stats.set_size(self.entries.len());
            true
        } else {
            false
        }
    }

    // == Clear ==
    /// Removes all entries and resets hit/miss counters to zero.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.reset();
    }

    // == Stats ==
    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_size(self.entries.len());
        stats
    }

    // == Sweep Expired ==
    /// Removes all expired entries, returning how many were dropped.
    ///
    /// Lazy expiry on read already guarantees expired values are never
    /// returned; sweeping just reclaims their memory earlier.
    pub fn sweep_expired(&mut self) -> usize {
        let now_ms = self.clock.now_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now_ms))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.set_size(self.entries.len());
        expired_keys.len()
    }

    // == Length ==
    /// Returns the number of stored entries, counting expired entries that
    /// have not yet been read or swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
