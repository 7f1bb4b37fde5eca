//! Cache doubles shared by service tests

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::{
    error::ApplicationError,
    ports::{CachePort, CacheStats, StoredEntry},
};

/// Unbounded map-backed cache without expiry
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, StoredEntry>>,
}

impl InMemoryCache {
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

#[async_trait]
impl CachePort for InMemoryCache {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
        Ok(self.entries.lock().get(key).map(|e| e.value.clone()))
    }

    async fn set_bytes(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), ApplicationError> {
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(30));
        self.entries.lock().insert(key.to_string(), StoredEntry {
            key: key.to_string(),
            value,
            stored_at: now,
            expires_at: now + ttl,
        });
        Ok(())
    }

    async fn list_entries(&self) -> Result<Vec<StoredEntry>, ApplicationError> {
        let mut entries: Vec<_> = self.entries.lock().values().cloned().collect();
        entries.sort_by(|a, b| b.stored_at.cmp(&a.stored_at));
        Ok(entries)
    }

    async fn invalidate(&self, key: &str) -> Result<(), ApplicationError> {
        self.entries.lock().remove(key);
        Ok(())
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len() as u64,
            ..Default::default()
        }
    }
}

/// Cache whose writes always fail, as when storage is full
#[derive(Debug)]
pub struct FailingCache;

#[async_trait]
impl CachePort for FailingCache {
    async fn get_bytes(&self, _key: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
        Ok(None)
    }

    async fn set_bytes(
        &self,
        _key: &str,
        _value: Vec<u8>,
        _ttl: Duration,
    ) -> Result<(), ApplicationError> {
        Err(ApplicationError::Cache("storage full".to_string()))
    }

    async fn list_entries(&self) -> Result<Vec<StoredEntry>, ApplicationError> {
        Ok(Vec::new())
    }

    async fn invalidate(&self, _key: &str) -> Result<(), ApplicationError> {
        Ok(())
    }

    fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}
