//! Moka in-memory cache implementation
//!
//! Thread-safe in-memory cache with per-entry TTL. Used when the cache
//! backend is `memory` and wherever a throwaway store is convenient.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use application::{
    error::ApplicationError,
    ports::{CachePort, CacheStats, StoredEntry},
};
use async_trait::async_trait;
use chrono::Utc;
use moka::{Expiry, future::Cache};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::{StampClock, nanos_to_datetime, ttl_nanos};

/// Longest expiry handed to moka; its timer wheel works with `Instant`s
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone)]
struct MokaEntry {
    data: Vec<u8>,
    stored_at: i64,
    expires_at: i64,
    ttl: Duration,
}

/// Expire each entry after the TTL it was written with
struct EntryExpiry;

impl Expiry<String, MokaEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &MokaEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &MokaEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Moka-based in-memory cache
///
/// Moka's own size-based eviction is frequency-aware; notes must go oldest
/// first, so the entry bound is enforced here on insert instead.
pub struct MokaCache {
    cache: Cache<String, MokaEntry>,
    max_entries: u64,
    clock: StampClock,
    write_lock: Mutex<()>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl std::fmt::Debug for MokaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCache")
            .field("entries", &self.cache.entry_count())
            .field("max_entries", &self.max_entries)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl MokaCache {
    /// Create a cache holding at most `max_entries` entries (minimum 1)
    #[must_use]
    pub fn new(max_entries: u64) -> Self {
        Self {
            cache: Cache::builder().expire_after(EntryExpiry).build(),
            max_entries: max_entries.max(1),
            clock: StampClock::default(),
            write_lock: Mutex::new(()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    fn live_count(&self) -> u64 {
        self.cache.iter().count() as u64
    }

    /// Drop the oldest entries until one more fits
    async fn make_room(&self, incoming: &str) {
        if self.cache.contains_key(incoming) {
            return;
        }
        self.cache.run_pending_tasks().await;

        let mut by_age: Vec<(i64, String)> = self
            .cache
            .iter()
            .map(|(k, v)| (v.stored_at, (*k).clone()))
            .collect();
        let len = by_age.len() as u64;
        if len < self.max_entries {
            return;
        }
        by_age.sort();

        let excess = usize::try_from(len + 1 - self.max_entries).unwrap_or(usize::MAX);
        for (_, victim) in by_age.into_iter().take(excess) {
            self.cache.invalidate(&victim).await;
            self.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(key = %victim, "Evicted oldest cache entry");
        }
    }
}

impl Default for MokaCache {
    fn default() -> Self {
        Self::new(200)
    }
}

#[async_trait]
impl CachePort for MokaCache {
    #[instrument(skip(self), level = "debug")]
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
        let now = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
        match self.cache.get(key).await {
            Some(entry) if now < entry.expires_at => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache hit");
                Ok(Some(entry.data))
            },
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache miss");
                Ok(None)
            },
        }
    }

    #[instrument(skip(self, value), level = "debug")]
    async fn set_bytes(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), ApplicationError> {
        let _guard = self.write_lock.lock().await;
        self.make_room(key).await;

        let stored_at = self.clock.next();
        let entry = MokaEntry {
            data: value,
            stored_at,
            expires_at: stored_at.saturating_add(ttl_nanos(ttl)),
            ttl: ttl.min(MAX_TTL),
        };
        self.cache.insert(key.to_string(), entry).await;
        debug!(key = %key, "Cache set");
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_entries(&self) -> Result<Vec<StoredEntry>, ApplicationError> {
        self.cache.run_pending_tasks().await;
        let now = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);

        let mut entries: Vec<(String, MokaEntry)> = self
            .cache
            .iter()
            .filter(|(_, v)| now < v.expires_at)
            .map(|(k, v)| ((*k).clone(), v))
            .collect();
        entries.sort_by(|(_, a), (_, b)| b.stored_at.cmp(&a.stored_at));

        Ok(entries
            .into_iter()
            .map(|(key, entry)| StoredEntry {
                key,
                stored_at: nanos_to_datetime(entry.stored_at),
                expires_at: nanos_to_datetime(entry.expires_at),
                value: entry.data,
            })
            .collect())
    }

    #[instrument(skip(self), level = "debug")]
    async fn invalidate(&self, key: &str) -> Result<(), ApplicationError> {
        self.cache.invalidate(key).await;
        debug!(key = %key, "Cache invalidated");
        Ok(())
    }

    fn stats(&self) -> CacheStats {
        let memory_bytes = self
            .cache
            .iter()
            .map(|(_, v)| v.data.len() as u64)
            .sum::<u64>();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.live_count(),
            memory_bytes,
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use application::ports::CachePortExt;

    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn set_and_get() {
        let cache = MokaCache::default();
        cache.put_json("key", &"value".to_string(), HOUR).await.unwrap();

        let result: Option<String> = cache.get_json("key").await.unwrap();
        assert_eq!(result, Some("value".to_string()));
        assert_eq!(cache.stats().hits, 1);
    }

    #[tokio::test]
    async fn miss_is_counted() {
        let cache = MokaCache::default();
        assert!(cache.get_bytes("absent").await.unwrap().is_none());
        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert!(stats.hit_rate().abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn zero_ttl_expires_immediately() {
        let cache = MokaCache::default();
        cache.set_bytes("k", b"v".to_vec(), Duration::ZERO).await.unwrap();
        assert!(cache.get_bytes("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn huge_ttl_keeps_entry() {
        let cache = MokaCache::default();
        cache
            .set_bytes("k", b"v".to_vec(), Duration::from_secs(u64::MAX))
            .await
            .unwrap();
        assert_eq!(cache.get_bytes("k").await.unwrap(), Some(b"v".to_vec()));
    }

    #[tokio::test]
    async fn evicts_oldest_when_full() {
        let cache = MokaCache::new(2);
        cache.set_bytes("a", b"1".to_vec(), HOUR).await.unwrap();
        cache.set_bytes("b", b"2".to_vec(), HOUR).await.unwrap();
        cache.set_bytes("c", b"3".to_vec(), HOUR).await.unwrap();

        assert!(cache.get_bytes("a").await.unwrap().is_none());
        assert!(cache.get_bytes("b").await.unwrap().is_some());
        assert!(cache.get_bytes("c").await.unwrap().is_some());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[tokio::test]
    async fn list_entries_newest_first() {
        let cache = MokaCache::default();
        cache.set_bytes("first", b"1".to_vec(), HOUR).await.unwrap();
        cache.set_bytes("second", b"2".to_vec(), HOUR).await.unwrap();

        let keys: Vec<_> = cache
            .list_entries()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.key)
            .collect();
        assert_eq!(keys, ["second", "first"]);
    }

    #[tokio::test]
    async fn invalidate_removes_entry() {
        let cache = MokaCache::default();
        cache.set_bytes("k", b"v".to_vec(), HOUR).await.unwrap();
        cache.invalidate("k").await.unwrap();
        assert!(cache.get_bytes("k").await.unwrap().is_none());
    }
}
