//! Response caching
//!
//! Memoizes successful responses keyed by request identity for a bounded
//! time-to-live. Entries are judged fresh at read time and evicted on read
//! once stale; there is no background sweep, so memory is bounded by the
//! distinct-key count of the API surface.

mod types;


pub use types::{CacheEntry, CacheKey, CacheStatistics};

use crate::error::CourierResult;
use crate::transport::ApiResponse;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory TTL cache for API responses
///
/// Cloning shares the underlying map. The map lock is never held across a
/// fetch, so two concurrent misses for the same key may both fetch; the
/// last write wins, which is acceptable because entries are immutable
/// snapshots of the same upstream resource.
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    entries: Arc<Mutex<HashMap<CacheKey, CacheEntry>>>,
    stats: Arc<Mutex<CacheStatistics>>,
}

impl ResponseCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a live entry
    ///
    /// A stale entry is removed and reported as a miss. A zero `ttl`
    /// disables caching and always misses.
    pub async fn get(&self, key: &CacheKey, ttl: Duration) -> Option<ApiResponse> {
        if ttl.is_zero() {
            return None;
        }

        let mut entries = self.entries.lock().await;
        let mut stats = self.stats.lock().await;

        match entries.get(key) {
            Some(entry) if entry.is_fresh(ttl) => {
                stats.hits += 1;
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                stats.evictions += 1;
                stats.misses += 1;
                None
            }
            None => {
                stats.misses += 1;
                None
            }
        }
    }

    /// Store a value, overwriting any prior entry for the same key
    pub async fn insert(&self, key: CacheKey, value: ApiResponse) {
        let mut entries = self.entries.lock().await;
        let mut stats = self.stats.lock().await;

        entries.insert(key, CacheEntry::new(value));
        stats.insertions += 1;
    }

    /// Return a live cached value, or fetch, store, and return it
    ///
    /// Fetch errors propagate to the caller and are never cached. A zero
    /// `ttl` bypasses the cache entirely in both directions.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        fetch: F,
    ) -> CourierResult<ApiResponse>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CourierResult<ApiResponse>>,
    {
        if ttl.is_zero() {
            return fetch().await;
        }

        if let Some(value) = self.get(key, ttl).await {
            debug!(key = %key, "cache hit");
            return Ok(value);
        }

        let value = fetch().await?;
        self.insert(key.clone(), value.clone()).await;
        Ok(value)
    }

    /// Remove an entry
    pub async fn remove(&self, key: &CacheKey) {
        let mut entries = self.entries.lock().await;
        if entries.remove(key).is_some() {
            self.stats.lock().await.evictions += 1;
        }
    }

    /// Drop all entries
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Number of stored entries, stale ones included
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Check whether the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Snapshot of hit/miss counters
    pub async fn statistics(&self) -> CacheStatistics {
        self.stats.lock().await.clone()
    }
}
