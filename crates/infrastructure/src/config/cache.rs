//! Note cache configuration.

use std::{path::PathBuf, time::Duration};

use application::ports::ttl;
use serde::{Deserialize, Serialize};

/// Storage backing the note cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Persistent on-disk store
    #[default]
    Redb,
    /// Process-local, lost on restart
    Memory,
}

/// Cache bounds and location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheAppConfig {
    #[serde(default)]
    pub backend: CacheBackend,

    /// Database file for the redb backend
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,

    /// Maximum number of stored notes; the oldest is evicted beyond this
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,

    /// Days before a stored note expires
    #[serde(default = "default_ttl_days")]
    pub ttl_days: u64,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("data/pearl_notes_cache.redb")
}

const fn default_max_entries() -> u64 {
    200
}

const fn default_ttl_days() -> u64 {
    30
}

impl Default for CacheAppConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            path: default_cache_path(),
            max_entries: default_max_entries(),
            ttl_days: default_ttl_days(),
        }
    }
}

impl CacheAppConfig {
    /// Note lifetime as a Duration
    #[must_use]
    pub const fn note_ttl(&self) -> Duration {
        ttl::days(self.ttl_days)
    }
}
