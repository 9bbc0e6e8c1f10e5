//! TTL cache for signed object URLs.
//!
//! Signed URLs are costly to mint and stay valid for hours, so resolved
//! URLs are kept per object path and written through to a [`CacheStore`]
//! that survives restarts.
//!
//! ## Degradation
//!
//! Writes land in memory first and mark the cache dirty; [`UrlCache::flush`]
//! writes one snapshot for any number of staged entries. Flushes are
//! serialized, so concurrent writers never race on the backing file.
//!
//! The persistent store is size-bounded. The first failed write (quota
//! exceeded, unwritable disk) switches the cache off for the rest of the
//! process: every lookup misses and every write is dropped. Callers never
//! see the error.

use chrono::{DateTime, Utc};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache_store::CacheStore;

/// Default lifetime of a cached signed URL.
pub const DEFAULT_SIGNED_URL_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// Default number of paths kept in memory.
pub const DEFAULT_MAX_ENTRIES: usize = 4096;

/// A cached URL and when it was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub url: String,
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Stale once `now - cached_at` reaches `ttl`.
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match (now - self.cached_at).to_std() {
            Ok(elapsed) => elapsed >= ttl,
            // cached_at in the future: clock moved backwards
            Err(_) => false,
        }
    }
}

/// Counters for the URL cache.
#[derive(Debug, Default)]
pub struct UrlCacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub expired: AtomicU64,
    pub writes: AtomicU64,
    /// Snapshots handed to the backing store
    pub flushes: AtomicU64,
    pub write_failures: AtomicU64,
}

impl UrlCacheStats {
    /// Cache hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}

/// Path -> URL cache with lazy TTL expiration and persistence through a
/// [`CacheStore`].
pub struct UrlCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
    store: Arc<dyn CacheStore>,
    /// Held across snapshot + save
    persist_lock: Mutex<()>,
    dirty: AtomicBool,
    degraded: AtomicBool,
    stats: Arc<UrlCacheStats>,
}

impl UrlCache {
    /// Open the cache, restoring still-fresh entries from `store`.
    ///
    /// A store that cannot be read starts the cache empty.
    pub async fn open(store: Arc<dyn CacheStore>, ttl: Duration, max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries.max(1)).unwrap_or(NonZeroUsize::MIN);
        let mut entries = LruCache::new(capacity);

        match store.load().await {
            Ok(persisted) => {
                let now = Utc::now();
                let mut restored = 0usize;
                for (path, entry) in persisted {
                    if !entry.is_stale(now, ttl) {
                        entries.put(path, entry);
                        restored += 1;
                    }
                }
                info!(restored, "Restored URL cache");
            }
            Err(e) => {
                warn!(error = %e, "Failed to load URL cache, starting empty");
            }
        }

        Self {
            entries: Mutex::new(entries),
            ttl,
            store,
            persist_lock: Mutex::new(()),
            dirty: AtomicBool::new(false),
            degraded: AtomicBool::new(false),
            stats: Arc::new(UrlCacheStats::default()),
        }
    }

    /// Cached URL for `path`, if present and not expired.
    pub async fn get(&self, path: &str) -> Option<String> {
        self.get_at(path, Utc::now()).await
    }

    /// Lookup as of `now`.
    pub async fn get_at(&self, path: &str, now: DateTime<Utc>) -> Option<String> {
        if self.is_degraded() {
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        let mut entries = self.entries.lock().await;

        let stale = match entries.get(path) {
            Some(entry) if !entry.is_stale(now, self.ttl) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.url.clone());
            }
            Some(_) => true,
            None => false,
        };

        if stale {
            entries.pop(path);
            self.stats.expired.fetch_add(1, Ordering::Relaxed);
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store `url` for `path`, replacing any previous entry, and persist.
    pub async fn put(&self, path: &str, url: &str) {
        self.put_at(path, url, Utc::now()).await
    }

    /// Store as of `now`.
    pub async fn put_at(&self, path: &str, url: &str, now: DateTime<Utc>) {
        self.stage_at(path, url, now).await;
        self.flush().await;
    }

    /// Store `url` in memory only; the next [`flush`](Self::flush) persists it.
    pub async fn stage(&self, path: &str, url: &str) {
        self.stage_at(path, url, Utc::now()).await
    }

    /// Stage as of `now`.
    pub async fn stage_at(&self, path: &str, url: &str, now: DateTime<Utc>) {
        if self.is_degraded() {
            return;
        }

        let mut entries = self.entries.lock().await;
        entries.put(
            path.to_string(),
            CacheEntry {
                url: url.to_string(),
                cached_at: now,
            },
        );
        self.dirty.store(true, Ordering::SeqCst);
        self.stats.writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Drop entries so the next lookup fetches a fresh URL.
    pub async fn invalidate(&self, paths: &[String]) {
        if self.is_degraded() {
            return;
        }

        let removed = {
            let mut entries = self.entries.lock().await;
            paths
                .iter()
                .filter(|path| entries.pop(path.as_str()).is_some())
                .count()
        };

        debug!(requested = paths.len(), removed, "Invalidated cached URLs");
        if removed > 0 {
            self.dirty.store(true, Ordering::SeqCst);
            self.flush().await;
        }
    }

    /// Write the current contents to the store if anything changed since
    /// the last flush.
    pub async fn flush(&self) {
        let _guard = self.persist_lock.lock().await;
        if self.is_degraded() || !self.dirty.swap(false, Ordering::SeqCst) {
            return;
        }

        let snapshot = snapshot(&*self.entries.lock().await);
        self.stats.flushes.fetch_add(1, Ordering::Relaxed);

        if let Err(e) = self.store.save(&snapshot).await {
            self.stats.write_failures.fetch_add(1, Ordering::Relaxed);
            if !self.degraded.swap(true, Ordering::SeqCst) {
                warn!(error = %e, "URL cache write failed, caching disabled");
            }
            self.entries.lock().await.clear();
        }
    }

    /// True once a write failure has switched the cache off.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn stats(&self) -> Arc<UrlCacheStats> {
        self.stats.clone()
    }
}

fn snapshot(entries: &LruCache<String, CacheEntry>) -> HashMap<String, CacheEntry> {
    entries
        .iter()
        .map(|(path, entry)| (path.clone(), entry.clone()))
        .collect()
}
