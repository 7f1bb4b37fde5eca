//! Cache implementations
//!
//! Provides note cache adapters for the application layer:
//! - `RedbCache`: Embedded persistent store (default)
//! - `MokaCache`: In-memory cache with per-entry TTL
//!
//! Both are bounded by entry count and evict the oldest entry first.

mod moka_cache;
mod redb_cache;

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use application::{error::ApplicationError, ports::CachePort};
use chrono::{DateTime, Utc};
use tracing::info;

pub use moka_cache::MokaCache;
pub use redb_cache::RedbCache;

use crate::config::{CacheAppConfig, CacheBackend};

/// Build the configured cache backend
pub fn build_cache(config: &CacheAppConfig) -> Result<Arc<dyn CachePort>, ApplicationError> {
    let cache: Arc<dyn CachePort> = match config.backend {
        CacheBackend::Redb => {
            Arc::new(RedbCache::new(&config.path)?.with_max_entries(config.max_entries))
        },
        CacheBackend::Memory => Arc::new(MokaCache::new(config.max_entries)),
    };
    info!(
        backend = ?config.backend,
        max_entries = config.max_entries,
        ttl_days = config.ttl_days,
        "Note cache ready"
    );
    Ok(cache)
}

/// Strictly increasing write timestamps (Unix nanoseconds)
///
/// Two writes in the same clock tick still get distinct, ordered stamps, so
/// "oldest first" eviction and "newest first" listing are well defined.
#[derive(Debug, Default)]
pub(crate) struct StampClock {
    last: AtomicI64,
}

impl StampClock {
    pub(crate) fn next(&self) -> i64 {
        let now = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last.saturating_add(1));
            match self.last.compare_exchange_weak(
                last,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}

pub(crate) fn nanos_to_datetime(nanos: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_nanos(nanos)
}

pub(crate) fn ttl_nanos(ttl: std::time::Duration) -> i64 {
    i64::try_from(ttl.as_nanos()).unwrap_or(i64::MAX)
}
