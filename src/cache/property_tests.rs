//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the cache's correctness properties. TTL
//! properties drive a ManualClock, so no case ever sleeps.

use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::TtlCache;
use crate::clock::ManualClock;
use crate::config::CacheConfig;

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;

fn cache_with_clock(max_entries: usize) -> (TtlCache<String>, ManualClock) {
    let clock = ManualClock::new();
    let config = CacheConfig {
        max_entries,
        default_ttl: Duration::from_secs(300),
        ..CacheConfig::default()
    };
    let cache = TtlCache::with_clock(config, Arc::new(clock.clone()));
    (cache, clock)
}

// == Strategies ==
/// Generates valid cache keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}"
}

/// Generates cache values
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}"
}

/// A single cache operation for sequence-based properties
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations, hit/miss counters reflect exactly the
    // get outcomes, and the reported size matches the stored entry count.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let (mut cache, _) = cache_with_clock(TEST_MAX_ENTRIES);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key, value, None);
                }
                CacheOp::Get { key } => {
                    match cache.get(&key) {
                        Some(_) => expected_hits += 1,
                        None => expected_misses += 1,
                    }
                }
                CacheOp::Delete { key } => {
                    cache.delete(&key);
                }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.size, cache.len(), "Size mismatch");
    }

    // Storing a pair and reading it back before expiry returns the exact
    // value last stored.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let (mut cache, _) = cache_with_clock(TEST_MAX_ENTRIES);

        cache.set(key.clone(), value.clone(), None);

        prop_assert_eq!(cache.get(&key), Some(value));
    }

    // After delete, a subsequent get misses.
    #[test]
    fn prop_delete_removes_entry(key in key_strategy(), value in value_strategy()) {
        let (mut cache, _) = cache_with_clock(TEST_MAX_ENTRIES);

        cache.set(key.clone(), value, None);
        prop_assert!(cache.has(&key));

        prop_assert!(cache.delete(&key));

        prop_assert_eq!(cache.get(&key), None);
    }

    // Storing V1 then V2 under one key yields V2 and a single entry.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let (mut cache, _) = cache_with_clock(TEST_MAX_ENTRIES);

        cache.set(key.clone(), value1, None);
        cache.set(key.clone(), value2.clone(), None);

        prop_assert_eq!(cache.get(&key), Some(value2));
        prop_assert_eq!(cache.len(), 1);
    }

    // The number of entries never exceeds the configured maximum.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200)
    ) {
        let max_entries = 50;
        let (mut cache, _) = cache_with_clock(max_entries);

        for (key, value) in entries {
            cache.set(key, value, None);
            prop_assert!(
                cache.len() <= max_entries,
                "Cache size {} exceeds max {}",
                cache.len(),
                max_entries
            );
        }
    }

    // An entry stored with a TTL is absent after that TTL elapses, with no
    // sweep and no explicit delete.
    #[test]
    fn prop_ttl_expiration_behavior(
        key in key_strategy(),
        value in value_strategy(),
        ttl_ms in 1u64..600_000
    ) {
        let (mut cache, clock) = cache_with_clock(TEST_MAX_ENTRIES);

        cache.set(key.clone(), value.clone(), Some(Duration::from_millis(ttl_ms)));

        clock.advance(Duration::from_millis(ttl_ms - 1));
        prop_assert_eq!(cache.get(&key), Some(value), "live before the deadline");

        clock.advance(Duration::from_millis(1));
        prop_assert_eq!(cache.get(&key), None, "absent once the TTL elapses");
    }
}

// Property tests for LRU eviction behavior
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Filling the cache to capacity and inserting one more key evicts
    // exactly the least recently used entry.
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::vec(key_strategy(), 3..10),
        new_key in key_strategy(),
        new_value in value_strategy()
    ) {
        let unique_keys: Vec<String> = initial_keys
            .into_iter()
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();

        prop_assume!(unique_keys.len() >= 2);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let (mut cache, _) = cache_with_clock(capacity);

        let oldest_key = unique_keys[0].clone();
        for key in &unique_keys {
            cache.set(key.clone(), format!("value_{}", key), None);
        }
        prop_assert_eq!(cache.len(), capacity);

        cache.set(new_key.clone(), new_value, None);

        prop_assert_eq!(cache.len(), capacity, "still at capacity after eviction");
        prop_assert_eq!(cache.get(&oldest_key), None, "oldest key was evicted");
        prop_assert!(cache.get(&new_key).is_some(), "new key exists");

        for key in unique_keys.iter().skip(1) {
            prop_assert!(
                cache.get(key).is_some(),
                "key '{}' should have survived",
                key
            );
        }
    }

    // A get on the eviction candidate promotes it, shifting eviction to the
    // next-oldest key.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::vec(key_strategy(), 3..8),
        new_key in key_strategy(),
        new_value in value_strategy()
    ) {
        let unique_keys: Vec<String> = keys
            .into_iter()
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();

        prop_assume!(unique_keys.len() >= 3);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let (mut cache, _) = cache_with_clock(capacity);

        for key in &unique_keys {
            cache.set(key.clone(), format!("value_{}", key), None);
        }

        let accessed_key = unique_keys[0].clone();
        let expected_evicted = unique_keys[1].clone();
        cache.get(&accessed_key);

        cache.set(new_key.clone(), new_value, None);

        prop_assert!(
            cache.get(&accessed_key).is_some(),
            "accessed key '{}' must not be evicted",
            accessed_key
        );
        prop_assert_eq!(
            cache.get(&expected_evicted),
            None,
            "key '{}' was the oldest after the access",
            expected_evicted
        );
        prop_assert!(cache.get(&new_key).is_some());
    }
}
