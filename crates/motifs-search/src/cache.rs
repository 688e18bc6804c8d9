//! In-process result caches.
//!
//! Entries are evicted least-recently-used at capacity and expire a fixed
//! time after insertion, whether or not they are read in between. Expiry uses
//! `tokio::time`, so tests can drive it with a paused clock.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use lru::LruCache;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use motifs_core::{Result, SearchMode, SearchRequest};

/// Canonical identity of a search request.
///
/// Built from the mode, the normalized query, the sorted dataset list, the
/// page, the page size and the reverse-complement flag. Logically identical
/// requests produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyParts<'a> {
    mode: SearchMode,
    query: String,
    datasets: &'a [String],
    page: i64,
    page_size: i64,
    rev_comp: bool,
}

impl CacheKey {
    pub fn for_request(request: &SearchRequest) -> Result<Self> {
        let parts = KeyParts {
            mode: request.mode(),
            query: request.query.normalized(),
            datasets: &request.datasets,
            page: request.paging.page,
            page_size: request.paging.page_size,
            rev_comp: request.rev_comp,
        };
        Ok(Self(serde_json::to_string(&parts)?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
}

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// LRU cache with a per-entry time to live.
///
/// A capacity of zero disables the cache: lookups miss and `put` reports
/// that nothing was stored.
pub struct TtlCache<K: Hash + Eq, V> {
    name: &'static str,
    entries: Option<Mutex<LruCache<K, Entry<V>>>>,
    ttl: Duration,
    counters: Counters,
}

impl<K: Hash + Eq, V: Clone> TtlCache<K, V> {
    pub fn new(name: &'static str, capacity: usize, ttl: Duration) -> Self {
        let entries = match NonZeroUsize::new(capacity) {
            Some(capacity) => Some(Mutex::new(LruCache::new(capacity))),
            None => {
                warn!(
                    subsystem = "search",
                    component = "cache",
                    cache = name,
                    "Cache disabled (capacity 0)"
                );
                None
            }
        };

        Self {
            name,
            entries,
            ttl,
            counters: Counters::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    /// Fresh value for `key`, if any. Expired entries are dropped.
    pub async fn get(&self, key: &K) -> Option<V> {
        let Some(entries) = &self.entries else {
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        };

        let mut entries = entries.lock().await;
        let now = Instant::now();

        let fresh = entries
            .get(key)
            .map(|entry| (entry.expires_at > now).then(|| entry.value.clone()));

        let hit = match fresh {
            Some(Some(value)) => Some(value),
            Some(None) => {
                entries.pop(key);
                debug!(
                    subsystem = "search",
                    component = "cache",
                    cache = self.name,
                    "Cache entry expired"
                );
                None
            }
            None => None,
        };

        let counter = if hit.is_some() {
            &self.counters.hits
        } else {
            &self.counters.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        hit
    }

    /// Store `value`; returns `false` when the cache is disabled or the
    /// expiry cannot be represented.
    pub async fn put(&self, key: K, value: V) -> bool {
        let Some(entries) = &self.entries else {
            return false;
        };

        let Some(expires_at) = Instant::now().checked_add(self.ttl) else {
            warn!(
                subsystem = "search",
                component = "cache",
                cache = self.name,
                ttl_secs = self.ttl.as_secs(),
                "Cache TTL out of range, entry not stored"
            );
            return false;
        };

        let entry = Entry { value, expires_at };
        entries.lock().await.put(key, entry);
        self.counters.inserts.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Number of stored entries, including ones not yet found expired.
    pub async fn len(&self) -> usize {
        match &self.entries {
            Some(entries) => entries.lock().await.len(),
            None => 0,
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        if let Some(entries) = &self.entries {
            entries.lock().await.clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            inserts: self.counters.inserts.load(Ordering::Relaxed),
        }
    }
}
