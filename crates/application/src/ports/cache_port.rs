//! Note cache port
//!
//! Saved notes live behind this trait; infrastructure provides a redb file
//! store and a moka in-memory store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ApplicationError;

/// A stored entry as returned by [`CachePort::list_entries`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub key: String,
    pub value: Vec<u8>,
    pub stored_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Expiring byte store keyed by note key
///
/// Values are opaque JSON bytes; [`CachePortExt`] adds the typed layer.
/// Writes are atomic per key and a full store drops its oldest entry first.
#[async_trait]
pub trait CachePort: Send + Sync + std::fmt::Debug {
    /// Bytes under `key`, or `None` when absent, expired or unreadable
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, ApplicationError>;

    /// Store `value` for `ttl`, replacing any previous value
    async fn set_bytes(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), ApplicationError>;

    /// All live entries, most recently stored first
    async fn list_entries(&self) -> Result<Vec<StoredEntry>, ApplicationError>;

    /// Remove `key`; removing a missing key succeeds
    async fn invalidate(&self, key: &str) -> Result<(), ApplicationError>;

    fn stats(&self) -> CacheStats;
}

/// JSON helpers over [`CachePort`]
#[async_trait]
pub trait CachePortExt: CachePort {
    /// Decode the value under `key`; undecodable bytes are an error
    async fn get_json<T>(&self, key: &str) -> Result<Option<T>, ApplicationError>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        let Some(bytes) = self.get_bytes(key).await? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| ApplicationError::Cache(format!("undecodable entry {key}: {e}")))
    }

    /// Encode `value` and store it for `ttl`
    async fn put_json<T>(&self, key: &str, value: &T, ttl: Duration) -> Result<(), ApplicationError>
    where
        T: serde::Serialize + Send + Sync,
    {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| ApplicationError::Cache(format!("unencodable entry {key}: {e}")))?;
        self.set_bytes(key, bytes, ttl).await
    }
}

impl<T: CachePort + ?Sized> CachePortExt for T {}

/// Counters reported on the settings screen
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Live entries
    pub entries: u64,
    /// Sum of stored value sizes
    pub memory_bytes: u64,
    /// Entries dropped to stay within `max_entries`
    pub evictions: u64,
}

impl CacheStats {
    /// Share of lookups that hit, in `0.0..=1.0`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }
}

/// Standard TTL values
pub mod ttl {
    use std::time::Duration;

    /// Default lifetime of saved notes (30 days)
    pub const NOTES: Duration = Duration::from_secs(30 * 24 * 60 * 60);

    const SECS_PER_DAY: u64 = 24 * 60 * 60;

    /// Build a TTL from a whole number of days, saturating at `u64::MAX` seconds
    #[must_use]
    pub const fn days(days: u64) -> Duration {
        Duration::from_secs(days.saturating_mul(SECS_PER_DAY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_without_lookups_is_zero() {
        assert!(CacheStats::default().hit_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn hit_rate_counts_hits_over_lookups() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            entries: 2,
            ..CacheStats::default()
        };
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn ttl_days_matches_default() {
        assert_eq!(ttl::days(30), ttl::NOTES);
        assert!(ttl::days(1) < ttl::NOTES);
    }

    #[test]
    fn ttl_days_saturates_instead_of_overflowing() {
        assert_eq!(ttl::days(300_000_000_000_000), Duration::from_secs(u64::MAX));
        assert_eq!(ttl::days(u64::MAX), Duration::from_secs(u64::MAX));
    }
}
