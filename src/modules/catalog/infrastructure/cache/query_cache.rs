use crate::modules::catalog::domain::CatalogEntry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Cached query result with TTL support
#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<CatalogEntry>,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn new(data: Vec<CatalogEntry>, ttl: Duration) -> Self {
        Self {
            data,
            created_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries_count: usize,
    pub expired_cleanups: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}

/// Short-lived cache of raw catalog results keyed by query
///
/// Each entry carries its own TTL (the stale time of the query kind that
/// produced it). Grouped views are never cached; they are rebuilt from the
/// raw entries on every read.
#[derive(Debug)]
pub struct QueryCache {
    cache: DashMap<String, CacheEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
    cleanups: AtomicU64,
    max_entries: usize,
}

impl QueryCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            cache: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            cleanups: AtomicU64::new(0),
            max_entries: max_entries.max(1),
        }
    }

    /// Cached entries for `key` if present and still fresh
    pub fn get(&self, key: &str) -> Option<Vec<CatalogEntry>> {
        // Bind the lookup so the shard read guard is released before any removal
        let fresh = self
            .cache
            .get(key)
            .map(|entry| (!entry.is_expired()).then(|| entry.data.clone()));

        match fresh {
            Some(Some(data)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit for key: {}", key);
                return Some(data);
            }
            Some(None) => {
                self.cache.remove(key);
                self.cleanups.fetch_add(1, Ordering::Relaxed);
                debug!("Removed expired cache entry for key: {}", key);
            }
            None => {}
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Cache miss for key: {}", key);
        None
    }

    /// Store entries for `key` until `ttl` elapses
    pub fn insert(&self, key: &str, data: Vec<CatalogEntry>, ttl: Duration) {
        if !self.cache.contains_key(key) && self.cache.len() >= self.max_entries {
            self.purge_expired();
            if self.cache.len() >= self.max_entries {
                self.evict_oldest_entries();
            }
        }

        self.cache
            .insert(key.to_string(), CacheEntry::new(data, ttl));
        debug!("Cached results for key: {} with TTL: {:?}", key, ttl);
    }

    pub fn invalidate(&self, key: &str) -> bool {
        self.cache.remove(key).is_some()
    }

    /// Drop every expired entry; returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let before = self.cache.len();
        self.cache.retain(|_, entry| !entry.is_expired());
        let removed = before.saturating_sub(self.cache.len());

        if removed > 0 {
            self.cleanups.fetch_add(removed as u64, Ordering::Relaxed);
            debug!("Cleaned up {} expired cache entries", removed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries_count: self.cache.len(),
            expired_cleanups: self.cleanups.load(Ordering::Relaxed),
        }
    }

    /// Clear all cached entries and counters
    pub fn clear(&self) {
        self.cache.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.cleanups.store(0, Ordering::Relaxed);
        info!("Query cache cleared");
    }

    /// Evict oldest entries down to 90% of capacity
    fn evict_oldest_entries(&self) {
        let current_size = self.cache.len();

        let mut by_age: Vec<(String, Instant)> = self
            .cache
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().created_at))
            .collect();
        by_age.sort_by_key(|(_, created_at)| *created_at);

        let target_size = (self.max_entries * 9) / 10;
        let entries_to_evict = current_size.saturating_sub(target_size).max(1);

        for (key, _) in by_age.into_iter().take(entries_to_evict) {
            self.cache.remove(&key);
        }

        debug!(
            "Evicted {} old cache entries (was {}, now {})",
            entries_to_evict,
            current_size,
            self.cache.len()
        );
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(500)
    }
}
