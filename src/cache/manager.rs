// src/cache/manager.rs
//
// Refresh-timestamp bookkeeping for cached data.
//
// Maps string keys to the epoch-millis time they were last refreshed.
// One mutex guards the whole map; last write wins. Missing keys are stale.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, TimeZone, Utc};

#[derive(Debug, Default)]
pub struct CacheManager {
    refreshed: Mutex<HashMap<String, i64>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Fresh lookups over all lookups (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl CacheManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, i64>> {
        // A poisoned map still holds valid timestamps.
        self.refreshed.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn mark_refreshed(&self, key: &str) {
        self.mark_refreshed_at(key, Utc::now());
    }

    pub fn mark_refreshed_at(&self, key: &str, at: DateTime<Utc>) {
        self.entries().insert(key.to_string(), at.timestamp_millis());
    }

    pub fn last_refreshed(&self, key: &str) -> Option<DateTime<Utc>> {
        let millis = *self.entries().get(key)?;
        Utc.timestamp_millis_opt(millis).single()
    }

    pub fn is_stale(&self, key: &str, ttl: Duration) -> bool {
        self.is_stale_at(key, ttl, Utc::now())
    }

    /// Stale when never refreshed, or when `now - refreshed >= ttl`.
    pub fn is_stale_at(&self, key: &str, ttl: Duration, now: DateTime<Utc>) -> bool {
        let stale = match self.entries().get(key) {
            Some(&millis) => now.timestamp_millis() - millis >= ttl.num_milliseconds(),
            None => true,
        };
        if stale {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        stale
    }

    pub fn invalidate(&self, key: &str) {
        self.entries().remove(key);
    }

    /// Drop every key starting with `prefix`. Returns how many were removed.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries().len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_missing_key_is_stale() {
        let cache = CacheManager::new();
        assert!(cache.is_stale("products", Duration::minutes(5)));
        assert!(cache.last_refreshed("products").is_none());
    }

    #[test]
    fn test_fresh_until_ttl_elapses() {
        let cache = CacheManager::new();
        let t0 = Utc::now();
        cache.mark_refreshed_at("products", t0);

        let ttl = Duration::minutes(5);
        assert!(!cache.is_stale_at("products", ttl, t0 + Duration::minutes(4)));
        assert!(cache.is_stale_at("products", ttl, t0 + Duration::minutes(5)));
    }

    #[test]
    fn test_last_write_wins() {
        let cache = CacheManager::new();
        let t0 = Utc.timestamp_millis_opt(1_000).unwrap();
        let t1 = Utc.timestamp_millis_opt(2_000).unwrap();
        cache.mark_refreshed_at("k", t1);
        cache.mark_refreshed_at("k", t0);
        assert_eq!(cache.last_refreshed("k"), Some(t0));
    }

    #[test]
    fn test_invalidate_and_prefix() {
        let cache = CacheManager::new();
        cache.mark_refreshed("products:1");
        cache.mark_refreshed("products:2");
        cache.mark_refreshed("categories");

        cache.invalidate("categories");
        assert!(cache.last_refreshed("categories").is_none());

        assert_eq!(cache.invalidate_prefix("products:"), 2);
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_clear() {
        let cache = CacheManager::new();
        cache.mark_refreshed("a");
        cache.mark_refreshed("b");
        cache.clear();
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_stats_track_hits_and_misses() {
        let cache = CacheManager::new();
        let ttl = Duration::hours(1);
        assert!(cache.is_stale("k", ttl));
        cache.mark_refreshed("k");
        assert!(!cache.is_stale("k", ttl));
        assert!(!cache.is_stale("k", ttl));

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = Arc::new(CacheManager::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.mark_refreshed(&format!("key:{}", i)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.stats().entries, 8);
    }
}
