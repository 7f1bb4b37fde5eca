//! Redb embedded cache implementation
//!
//! Persistent key-value store for saved notes. Redb is blocking, so every
//! operation runs on the blocking pool.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use application::{
    error::ApplicationError,
    ports::{CachePort, CacheStats, StoredEntry},
};
use async_trait::async_trait;
use bincode::{Decode, Encode};
use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use tracing::{debug, instrument, warn};

use super::{StampClock, nanos_to_datetime, ttl_nanos};

/// Table definition for cache entries
const CACHE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("notes_cache");

/// Default bound on stored entries
const DEFAULT_MAX_ENTRIES: u64 = 200;

/// Entry wrapper with write and expiry stamps (Unix nanoseconds)
#[derive(Debug, Encode, Decode)]
struct CacheEntry {
    data: Vec<u8>,
    stored_at: i64,
    expires_at: i64,
}

impl CacheEntry {
    fn encode(&self) -> Result<Vec<u8>, ApplicationError> {
        bincode::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| ApplicationError::Cache(format!("Entry serialize error: {e}")))
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        bincode::decode_from_slice::<Self, _>(bytes, bincode::config::standard())
            .ok()
            .map(|(entry, _)| entry)
    }

    fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

fn now_nanos() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}

fn storage_error(context: &str, e: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Cache(format!("{context}: {e}"))
}

fn join_error(e: tokio::task::JoinError) -> ApplicationError {
    ApplicationError::Internal(format!("Task join error: {e}"))
}

/// Redb-based persistent cache
///
/// # Auto-Recovery
///
/// If the database file is corrupted or incompatible, it is deleted and
/// recreated on open. Individual entries that fail to decode read as misses
/// and are the first to go when space is needed.
pub struct RedbCache {
    db: Arc<Database>,
    path: Option<PathBuf>,
    max_entries: u64,
    clock: StampClock,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: Arc<AtomicU64>,
}

impl std::fmt::Debug for RedbCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbCache")
            .field("db", &"<Database>")
            .field("path", &self.path)
            .field("max_entries", &self.max_entries)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl RedbCache {
    /// Open (or create) a cache file at `path`
    ///
    /// Missing parent directories are created.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ApplicationError> {
        let path_buf = path.as_ref().to_path_buf();

        if let Some(parent) = path_buf.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| storage_error("Failed to create cache directory", e))?;
            }
        }

        let db = match Database::create(&path_buf) {
            Ok(db) => db,
            Err(e) => {
                warn!(
                    path = %path_buf.display(),
                    error = %e,
                    "Cache database corrupted or incompatible, recreating"
                );
                if path_buf.exists() {
                    fs::remove_file(&path_buf)
                        .map_err(|e| storage_error("Failed to remove corrupted database", e))?;
                }
                Database::create(&path_buf)
                    .map_err(|e| storage_error("Failed to create Redb database", e))?
            },
        };

        Self::from_database(db, Some(path_buf))
    }

    /// Create an in-memory Redb cache
    pub fn in_memory() -> Result<Self, ApplicationError> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| storage_error("Failed to create in-memory Redb", e))?;
        Self::from_database(db, None)
    }

    fn from_database(db: Database, path: Option<PathBuf>) -> Result<Self, ApplicationError> {
        // Opening the table creates it if it doesn't exist
        let write_txn = db
            .begin_write()
            .map_err(|e| storage_error("Failed to begin write transaction", e))?;
        {
            let _ = write_txn
                .open_table(CACHE_TABLE)
                .map_err(|e| storage_error("Failed to open cache table", e))?;
        }
        write_txn
            .commit()
            .map_err(|e| storage_error("Failed to commit transaction", e))?;

        Ok(Self {
            db: Arc::new(db),
            path,
            max_entries: DEFAULT_MAX_ENTRIES,
            clock: StampClock::default(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Bound the number of stored entries (minimum 1)
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: u64) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    /// Remove expired and undecodable entries, returning how many went
    #[instrument(skip(self))]
    pub async fn cleanup_expired(&self) -> Result<u64, ApplicationError> {
        let db = Arc::clone(&self.db);

        let removed = tokio::task::spawn_blocking(move || {
            let now = now_nanos();
            let write_txn = db.begin_write()?;
            let mut removed = 0u64;
            {
                let mut table = write_txn.open_table(CACHE_TABLE)?;
                let stale: Vec<String> = table
                    .iter()?
                    .filter_map(Result::ok)
                    .filter(|(_, value)| {
                        CacheEntry::decode(value.value()).is_none_or(|e| e.is_expired(now))
                    })
                    .map(|(key, _)| key.value().to_string())
                    .collect();

                for key in stale {
                    table.remove(key.as_str())?;
                    removed += 1;
                }
            }
            write_txn.commit()?;
            Ok::<_, redb::Error>(removed)
        })
        .await
        .map_err(join_error)?
        .map_err(|e| storage_error("Redb cleanup error", e))?;

        if removed > 0 {
            debug!(removed, "Cleaned up expired cache entries");
        }
        Ok(removed)
    }

    fn remove_in_background(&self, key: &str) {
        let db = Arc::clone(&self.db);
        let key = key.to_string();
        tokio::task::spawn_blocking(move || {
            if let Ok(write_txn) = db.begin_write() {
                let removed = write_txn.open_table(CACHE_TABLE).is_ok_and(|mut table| {
                    let _ = table.remove(key.as_str());
                    true
                });
                if removed {
                    let _ = write_txn.commit();
                }
            }
        });
    }

    /// Entry count and total stored bytes
    fn usage(&self) -> (u64, u64) {
        let Ok(read_txn) = self.db.begin_read() else {
            return (0, 0);
        };
        let Ok(table) = read_txn.open_table(CACHE_TABLE) else {
            return (0, 0);
        };
        let entries = table.len().unwrap_or(0);
        let bytes = table
            .iter()
            .map(|iter| {
                iter.filter_map(Result::ok)
                    .map(|(_, value)| value.value().len() as u64)
                    .sum::<u64>()
            })
            .unwrap_or(0);
        (entries, bytes)
    }
}

#[async_trait]
impl CachePort for RedbCache {
    #[instrument(skip(self), level = "debug")]
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
        let db = Arc::clone(&self.db);
        let owned_key = key.to_string();

        let raw = tokio::task::spawn_blocking(move || {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(CACHE_TABLE)?;
            Ok::<_, redb::Error>(table.get(owned_key.as_str())?.map(|v| v.value().to_vec()))
        })
        .await
        .map_err(join_error)?
        .map_err(|e| storage_error("Redb get error", e))?;

        let Some(raw) = raw else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Cache miss (Redb)");
            return Ok(None);
        };

        match CacheEntry::decode(&raw) {
            Some(entry) if !entry.is_expired(now_nanos()) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache hit (Redb)");
                Ok(Some(entry.data))
            },
            Some(_) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache entry expired");
                self.remove_in_background(key);
                Ok(None)
            },
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                warn!(key = %key, "Dropping undecodable cache entry");
                self.remove_in_background(key);
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
        let stored_at = self.clock.next();
        let entry_bytes = CacheEntry {
            data: value,
            stored_at,
            expires_at: stored_at.saturating_add(ttl_nanos(ttl)),
        }
        .encode()?;

        let db = Arc::clone(&self.db);
        let owned_key = key.to_string();
        let max_entries = self.max_entries;

        let evicted = tokio::task::spawn_blocking(move || {
            let write_txn = db.begin_write()?;
            let mut evicted = 0u64;
            {
                let mut table = write_txn.open_table(CACHE_TABLE)?;
                table.insert(owned_key.as_str(), entry_bytes.as_slice())?;

                let len = table.len()?;
                if len > max_entries {
                    // Undecodable entries sort first (stamp i64::MIN)
                    let mut by_age: Vec<(i64, String)> = table
                        .iter()?
                        .filter_map(Result::ok)
                        .map(|(k, v)| {
                            let stamp =
                                CacheEntry::decode(v.value()).map_or(i64::MIN, |e| e.stored_at);
                            (stamp, k.value().to_string())
                        })
                        .filter(|(_, k)| *k != owned_key)
                        .collect();
                    by_age.sort();

                    let excess = usize::try_from(len - max_entries).unwrap_or(usize::MAX);
                    for (_, victim) in by_age.into_iter().take(excess) {
                        table.remove(victim.as_str())?;
                        evicted += 1;
                    }
                }
            }
            write_txn.commit()?;
            Ok::<_, redb::Error>(evicted)
        })
        .await
        .map_err(join_error)?
        .map_err(|e| storage_error("Redb insert error", e))?;

        if evicted > 0 {
            self.evictions.fetch_add(evicted, Ordering::Relaxed);
            debug!(evicted, "Evicted oldest cache entries");
        }
        debug!(key = %key, ttl_secs = ttl.as_secs(), "Cache set (Redb)");
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_entries(&self) -> Result<Vec<StoredEntry>, ApplicationError> {
        let db = Arc::clone(&self.db);

        let mut entries = tokio::task::spawn_blocking(move || {
            let now = now_nanos();
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(CACHE_TABLE)?;
            let entries: Vec<(String, CacheEntry)> = table
                .iter()?
                .filter_map(Result::ok)
                .filter_map(|(k, v)| {
                    CacheEntry::decode(v.value()).map(|entry| (k.value().to_string(), entry))
                })
                .filter(|(_, entry)| !entry.is_expired(now))
                .collect();
            Ok::<_, redb::Error>(entries)
        })
        .await
        .map_err(join_error)?
        .map_err(|e| storage_error("Redb list error", e))?;

        entries.sort_by(|(_, a), (_, b)| b.stored_at.cmp(&a.stored_at));

        Ok(entries
            .into_iter()
            .map(|(key, entry)| StoredEntry {
                key,
                value: entry.data,
                stored_at: nanos_to_datetime(entry.stored_at),
                expires_at: nanos_to_datetime(entry.expires_at),
            })
            .collect())
    }

    #[instrument(skip(self), level = "debug")]
    async fn invalidate(&self, key: &str) -> Result<(), ApplicationError> {
        let db = Arc::clone(&self.db);
        let owned_key = key.to_string();

        tokio::task::spawn_blocking(move || {
            let write_txn = db.begin_write()?;
            {
                let mut table = write_txn.open_table(CACHE_TABLE)?;
                table.remove(owned_key.as_str())?;
            }
            write_txn.commit()?;
            Ok::<_, redb::Error>(())
        })
        .await
        .map_err(join_error)?
        .map_err(|e| storage_error("Redb remove error", e))?;

        debug!(key = %key, "Cache invalidated (Redb)");
        Ok(())
    }

    fn stats(&self) -> CacheStats {
        let (entries, memory_bytes) = self.usage();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
            memory_bytes,
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}
