//! Cache backend: in-process map or Redis.
//!
//! The backend is a plain key/value service: `get`, `set`-with-TTL, and
//! `delete`, each a single independent call with no transactional
//! grouping. Transport failures are returned to the caller: a failed
//! `get` is an error, not a miss, so a downstream layer can never confuse
//! "cache is down" with "value is absent". Writes and deletes are awaited
//! for the same reason: invalidation ordering is only real if the delete
//! has actually happened when the call returns.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use deadpool_redis::Pool;
use redis::AsyncCommands;

use crate::error::CacheError;
use crate::CacheResult;

/// A cached entry with TTL support.
///
/// The data is wrapped in `Arc` to allow cheap cloning on cache hits.
#[derive(Clone, Debug)]
pub struct CachedEntry {
    /// The cached bytes.
    pub data: Arc<Vec<u8>>,
    /// When the entry was stored.
    pub cached_at: Instant,
    /// Time-to-live from `cached_at`.
    pub ttl: Duration,
}

impl CachedEntry {
    /// Create a new cached entry.
    #[must_use]
    pub fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data: Arc::new(data),
            cached_at: Instant::now(),
            ttl,
        }
    }

    /// Check if this entry has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.cached_at.elapsed() > self.ttl
    }
}

/// Key/value cache backend.
///
/// - **Local**: single-instance mode using an in-process map; also the
///   test backend.
/// - **Redis**: shared cache for multi-instance deployments.
#[derive(Clone)]
pub enum CacheBackend {
    /// Single-instance: local map only.
    Local(Arc<DashMap<String, CachedEntry>>),

    /// Multi-instance: Redis connection pool.
    Redis(Pool),
}

impl CacheBackend {
    /// Create a new local-only cache backend.
    #[must_use]
    pub fn new_local() -> Self {
        CacheBackend::Local(Arc::new(DashMap::new()))
    }

    /// Create a new Redis-backed cache backend.
    #[must_use]
    pub fn new_redis(pool: Pool) -> Self {
        CacheBackend::Redis(pool)
    }

    /// Get a value from the cache.
    ///
    /// Returns `Ok(None)` on a genuine miss (including a lazily-expired
    /// local entry).
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unavailable`] if the cache call fails.
    pub async fn get(&self, key: &str) -> CacheResult<Option<Arc<Vec<u8>>>> {
        match self {
            CacheBackend::Local(map) => {
                if let Some(entry) = map.get(key) {
                    if !entry.is_expired() {
                        tracing::debug!(key = %key, "cache hit");
                        return Ok(Some(Arc::clone(&entry.data)));
                    }
                    drop(entry);
                    map.remove(key);
                }
                tracing::debug!(key = %key, "cache miss");
                Ok(None)
            }
            CacheBackend::Redis(pool) => {
                let mut conn = pool
                    .get()
                    .await
                    .map_err(|e| CacheError::unavailable(e.to_string()))?;
                let data: Option<Vec<u8>> = conn
                    .get(key)
                    .await
                    .map_err(|e| CacheError::unavailable(e.to_string()))?;
                match data {
                    Some(data) => {
                        tracing::debug!(key = %key, "cache hit");
                        Ok(Some(Arc::new(data)))
                    }
                    None => {
                        tracing::debug!(key = %key, "cache miss");
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Set a value in the cache with a TTL.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unavailable`] if the cache call fails.
    pub async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        match self {
            CacheBackend::Local(map) => {
                map.insert(key.to_string(), CachedEntry::new(value, ttl));
                Ok(())
            }
            CacheBackend::Redis(pool) => {
                let mut conn = pool
                    .get()
                    .await
                    .map_err(|e| CacheError::unavailable(e.to_string()))?;
                conn.set_ex::<_, _, ()>(key, value, ttl.as_secs())
                    .await
                    .map_err(|e| CacheError::unavailable(e.to_string()))?;
                tracing::debug!(key = %key, ttl_secs = %ttl.as_secs(), "cache set");
                Ok(())
            }
        }
    }

    /// Delete a cache entry.
    ///
    /// Deleting an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unavailable`] if the cache call fails.
    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        match self {
            CacheBackend::Local(map) => {
                map.remove(key);
                tracing::debug!(key = %key, "cache entry deleted");
                Ok(())
            }
            CacheBackend::Redis(pool) => {
                let mut conn = pool
                    .get()
                    .await
                    .map_err(|e| CacheError::unavailable(e.to_string()))?;
                conn.del::<_, ()>(key)
                    .await
                    .map_err(|e| CacheError::unavailable(e.to_string()))?;
                tracing::debug!(key = %key, "cache entry deleted");
                Ok(())
            }
        }
    }

    /// Check if the cache service is reachable (for health checks).
    pub async fn is_available(&self) -> bool {
        match self {
            CacheBackend::Local(_) => true,
            CacheBackend::Redis(pool) => pool.get().await.is_ok(),
        }
    }
}
