use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// A single cached value, stored as JSON so heterogeneous stage results
/// can share one store.
#[derive(Debug)]
struct StoredEntry {
    payload: String,
    expires_at: Instant,
}

impl StoredEntry {
    fn is_live(&self) -> bool {
        self.expires_at > Instant::now()
    }
}

/// Process-wide in-memory cache with per-entry expiration.
///
/// Entries are immutable once written and disappear after their
/// time-to-live. The cache is shared across concurrent requests without a
/// single-flight guarantee: two simultaneous misses for the same key may
/// both compute, and the later write wins.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, StoredEntry>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a live entry exists for `key`.
    ///
    /// Read-only: never evicts and never extends an entry's lifetime. An
    /// expired entry reads as absent.
    pub async fn exists(&self, key: &str) -> bool {
        let entries = self.entries.read().await;
        entries.get(key).is_some_and(StoredEntry::is_live)
    }

    /// Retrieves a value if it exists and has not expired.
    /// Returns `None` for cache misses; expired entries are dropped.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.is_live() => {
                tracing::debug!("Key found and still fresh");
                let value = serde_json::from_str(&entry.payload)
                    .context("Failed to deserialize cached value")?;
                Ok(Some(value))
            }
            Some(_) => {
                tracing::debug!("Key found but expired");
                entries.remove(key);
                Ok(None)
            }
            None => {
                tracing::debug!("Key not found");
                Ok(None)
            }
        }
    }

    /// Stores a serializable value with a time-to-live (TTL).
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub async fn put<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or(anyhow!("TTL overflow"))?;
        let payload =
            serde_json::to_string(value).context("Failed to serialize value for caching")?;

        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), StoredEntry { payload, expires_at });
        Ok(())
    }

    /// Returns the live entry for `key`, or computes, stores and returns a
    /// fresh value.
    ///
    /// `compute` is invoked at most once per call and only on a miss. An
    /// `Err` from `compute` propagates to the caller and nothing is stored,
    /// so a failed computation is retried on the next call.
    pub async fn fetch_or_compute<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.get(key).await? {
            return Ok(value);
        }

        let value = compute().await?;
        self.put(key, &value, ttl).await?;
        Ok(value)
    }

    /// Manually removes a key from the cache.
    pub async fn remove(&self, key: &str) {
        let mut entries = self.entries.write().await;
        entries.remove(key);
    }
}
