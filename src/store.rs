//! Named cache store.
//!
//! `NamedCache` is the handle a [`CacheManager`](crate::CacheManager) hands
//! out. Entries are stored by value as JSON payloads, so a single cache can
//! hold any serde-serializable entry type. Expiry is checked on access and
//! the capacity bound is enforced with a coarse batch eviction.

use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::metrics::CacheMetrics;
use crate::CacheOperations;
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Stored entry with expiry metadata.
#[derive(Debug, Clone)]
struct StoredEntry {
    payload: String,
    expires_at: Option<Instant>,
}

impl StoredEntry {
    fn new(payload: String, ttl: Option<Duration>) -> Self {
        Self {
            payload,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    #[inline]
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// A named cache created and owned by a `CacheManager`.
///
/// Thread-safe; concurrent operations on the same key are serialized by the
/// underlying map's per-entry atomicity. No ordering is promised across
/// different keys.
#[derive(Debug)]
pub struct NamedCache {
    name: String,
    manager_name: String,
    entries: DashMap<String, StoredEntry>,
    ttl: Option<Duration>,
    ttl_jitter: bool,
    max_entries: Option<usize>,
    metrics: CacheMetrics,
}

impl NamedCache {
    pub(crate) fn new(manager_name: &str, name: &str, config: &CacheConfig) -> Self {
        debug!(
            cache = %name,
            manager = %manager_name,
            max_entries = ?config.max_entries,
            ttl = ?config.ttl,
            "Creating named cache"
        );
        Self {
            name: name.to_string(),
            manager_name: manager_name.to_string(),
            entries: DashMap::new(),
            ttl: config.ttl,
            ttl_jitter: config.ttl_jitter,
            max_entries: config.max_entries,
            metrics: CacheMetrics::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn manager_name(&self) -> &str {
        &self.manager_name
    }

    /// Number of stored entries, including any expired but not yet
    /// collected by an access.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fetch the raw JSON payload for a key, expiring it on read.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        let entry = self.entries.get(key)?;
        if entry.is_expired() {
            // Release the shard lock before removing.
            drop(entry);
            self.evict(key);
            return None;
        }
        Some(entry.payload.clone())
    }

    /// Per-entry TTL with 0-10% random jitter so entries written together
    /// do not expire together.
    fn effective_ttl(&self) -> Option<Duration> {
        let ttl = self.ttl?;
        if !self.ttl_jitter {
            return Some(ttl);
        }
        let jitter_percent = (rand::random::<u32>() % 10) as f64 / 100.0;
        Some(ttl.mul_f64(1.0 + jitter_percent))
    }

    fn evict(&self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.metrics.record_eviction(&self.name);
            debug!(cache = %self.name, key = %key, "Evicted entry");
        }
    }

    /// Enforce the capacity bound before an insert grows the map.
    ///
    /// Deliberately coarse: evicts a ~10% batch in iteration order rather
    /// than tracking recency.
    fn enforce_capacity(&self) {
        let Some(max) = self.max_entries else {
            return;
        };
        if self.entries.len() < max {
            return;
        }

        let evict_count = (max / 10).max(1);
        warn!(
            cache = %self.name,
            entries = self.entries.len(),
            evict_count,
            "Cache capacity reached, evicting batch"
        );

        let victims: Vec<String> = self
            .entries
            .iter()
            .take(evict_count)
            .map(|entry| entry.key().clone())
            .collect();
        for key in victims {
            self.evict(&key);
        }
    }
}

impl CacheOperations for NamedCache {
    fn put<T: Serialize>(&self, key: &str, value: &T) -> CacheResult<()> {
        let payload = serde_json::to_string(value).map_err(|e| {
            self.metrics.record_error(&self.name, "serialize");
            CacheError::Serialization(e)
        })?;

        // Overwrites do not grow the map; only enforce on fresh keys.
        if !self.entries.contains_key(key) {
            self.enforce_capacity();
        }

        self.entries
            .insert(key.to_string(), StoredEntry::new(payload, self.effective_ttl()));
        self.metrics.record_write(&self.name);
        debug!(cache = %self.name, key = %key, "Cache put");
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        match self.get_raw(key) {
            Some(payload) => match serde_json::from_str::<T>(&payload) {
                Ok(value) => {
                    self.metrics.record_hit(&self.name);
                    debug!(cache = %self.name, key = %key, "Cache hit");
                    Ok(Some(value))
                }
                Err(e) => {
                    warn!(cache = %self.name, key = %key, error = %e, "Cache deserialization failed");
                    self.metrics.record_error(&self.name, "deserialize");
                    // Drop the bad entry so the next read is a clean miss.
                    self.entries.remove(key);
                    Ok(None)
                }
            },
            None => {
                self.metrics.record_miss(&self.name);
                debug!(cache = %self.name, key = %key, "Cache miss");
                Ok(None)
            }
        }
    }

    fn contains_key(&self, key: &str) -> bool {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                drop(entry);
                self.evict(key);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    fn remove(&self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.metrics.record_invalidation(&self.name);
            debug!(cache = %self.name, key = %key, "Cache remove");
        }
        removed
    }

    fn remove_all(&self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.metrics.record_clear(&self.name, count);
        debug!(cache = %self.name, removed = count, "Cache cleared");
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Payload {
        name: String,
        weight: u32,
    }

    fn cache_with(config: CacheConfig) -> NamedCache {
        NamedCache::new("store_test_manager", "store_test", &config)
    }

    fn cache() -> NamedCache {
        cache_with(CacheConfig::default())
    }

    #[test]
    fn test_put_then_get_roundtrips() {
        let cache = cache();
        let value = Payload {
            name: "alpha".to_string(),
            weight: 7,
        };

        cache.put("k1", &value).unwrap();
        let got: Option<Payload> = cache.get("k1").unwrap();
        assert_eq!(got, Some(value));
    }

    #[test]
    fn test_get_missing_is_none() {
        let cache = cache();
        let got: Option<Payload> = cache.get("nope").unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn test_put_overwrites() {
        let cache = cache();
        cache.put("k", &1u32).unwrap();
        cache.put("k", &2u32).unwrap();
        assert_eq!(cache.get::<u32>("k").unwrap(), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_remove_reports_presence() {
        let cache = cache();
        cache.put("k", &true).unwrap();
        assert!(cache.remove("k"));
        assert!(!cache.remove("k"));
        assert_eq!(cache.get::<bool>("k").unwrap(), None);
    }

    #[test]
    fn test_remove_all_counts_and_empties() {
        let cache = cache();
        for i in 0..5 {
            cache.put(&format!("k{i}"), &i).unwrap();
        }
        assert_eq!(cache.remove_all(), 5);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_contains_key_tracks_liveness() {
        let cache = cache();
        assert!(!cache.contains_key("k"));
        cache.put("k", &"v").unwrap();
        assert!(cache.contains_key("k"));
        cache.remove("k");
        assert!(!cache.contains_key("k"));
    }

    #[test]
    fn test_expired_entries_read_as_absent() {
        let cache = cache_with(
            CacheConfig::new()
                .with_ttl(Duration::from_millis(40))
                .without_jitter(),
        );
        cache.put("k", &"v").unwrap();
        assert!(cache.contains_key("k"));

        std::thread::sleep(Duration::from_millis(60));

        assert_eq!(cache.get::<String>("k").unwrap(), None);
        assert!(!cache.contains_key("k"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_bound_evicts_a_batch() {
        let cache = cache_with(CacheConfig::new().with_max_entries(10));
        for i in 0..25 {
            cache.put(&format!("k{i}"), &i).unwrap();
        }
        assert!(
            cache.len() <= 10,
            "capacity should be enforced, got {} entries",
            cache.len()
        );
    }

    #[test]
    fn test_overwrite_at_capacity_does_not_evict() {
        let cache = cache_with(CacheConfig::new().with_max_entries(3));
        for i in 0..3 {
            cache.put(&format!("k{i}"), &i).unwrap();
        }
        cache.put("k0", &99).unwrap();
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get::<i32>("k0").unwrap(), Some(99));
    }

    #[test]
    fn test_unserializable_value_is_rejected() {
        let cache = cache();
        // serde_json cannot encode maps with non-string keys.
        let bad: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);
        let err = cache.put("k", &bad).unwrap_err();
        assert!(matches!(err, CacheError::Serialization(_)));
        assert!(!cache.contains_key("k"));
    }

    #[test]
    fn test_corrupted_payload_is_dropped() {
        let cache = cache();
        // A JSON string is valid storage but not a valid Payload.
        cache.put("k", &"just a string").unwrap();

        let got: Option<Payload> = cache.get("k").unwrap();
        assert!(got.is_none());
        // The bad entry is gone, not stuck.
        assert!(!cache.contains_key("k"));
    }

    #[test]
    fn test_caches_are_independent() {
        let a = cache_with(CacheConfig::default());
        let b = NamedCache::new("store_test_manager", "other", &CacheConfig::default());
        a.put("k", &1u8).unwrap();
        assert_eq!(b.get::<u8>("k").unwrap(), None);
    }
}
