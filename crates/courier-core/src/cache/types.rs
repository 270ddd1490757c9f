//! Cache types and data structures

use crate::transport::{ApiResponse, Method};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

/// Cache key identifying a request by its logical identity
///
/// Two requests with the same method, path, and multiset of query pairs
/// (in any order) produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Upper-case HTTP method name
    pub method: String,
    /// Request path
    pub path: String,
    /// Query parameters sorted by key, then value
    pub query: Vec<(String, String)>,
    /// Precomputed hash for fast comparison
    pub hash: u64,
}

impl CacheKey {
    /// Create a cache key from request parts
    pub fn new(method: Method, path: &str, query: &[(String, String)]) -> Self {
        let mut sorted = query.to_vec();
        sorted.sort();

        let method = method.as_str().to_string();
        let path = path.to_string();

        let mut hasher = DefaultHasher::new();
        method.hash(&mut hasher);
        path.hash(&mut hasher);
        sorted.hash(&mut hasher);
        let hash = hasher.finish();

        Self {
            method,
            path,
            query: sorted,
            hash,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}

/// Cache entry: a stored response and its insertion time
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Cached response
    pub value: ApiResponse,
    /// When the entry was created
    pub inserted_at: Instant,
}

impl CacheEntry {
    /// Create a new entry stamped now
    pub fn new(value: ApiResponse) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    /// Age of the entry
    pub fn age(&self) -> Duration {
        self.inserted_at.elapsed()
    }

    /// An entry is fresh while its age is strictly below the TTL
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}

/// Cache hit/miss counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStatistics {
    /// Lookups answered from a live entry
    pub hits: u64,
    /// Lookups that found nothing usable
    pub misses: u64,
    /// Values stored
    pub insertions: u64,
    /// Entries dropped, stale reads included
    pub evictions: u64,
}

impl CacheStatistics {
    /// Fraction of lookups answered from cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
