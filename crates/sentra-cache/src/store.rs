//! The cache-aside store.
//!
//! Wraps a backing-store accessor with read-through-on-miss and
//! invalidate-on-write. Values are serialized as MessagePack. Two rules
//! are load-bearing:
//!
//! - Negative lookups stay uncached. A missing resource is usually
//!   "doesn't exist *yet*"; pinning the absence under a TTL would hide
//!   its creation.
//! - Within a write, the store commit strictly precedes invalidation. If
//!   invalidation ran first, a concurrent reader could repopulate the
//!   cache with the pre-mutation value before the commit lands.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::CacheBackend;
use crate::error::CacheError;
use crate::keys::{CacheKey, Volatility};

/// Error from a cache-aside operation.
///
/// Keeps cache transport failures and backing-store failures distinct: a
/// store failure is never masked as a cache miss, and a cache failure is
/// never mistaken for a missing resource.
#[derive(Debug, thiserror::Error)]
pub enum CacheAsideError<E> {
    /// The cache call failed.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The backing-store accessor failed.
    #[error("Store error: {0}")]
    Store(E),
}

/// Cache-aside wrapper over a [`CacheBackend`].
///
/// Parametrized per call by a resource key and a backing-store accessor;
/// the wrapper itself holds no per-resource state and is shared
/// process-wide.
#[derive(Clone)]
pub struct CacheAside {
    backend: CacheBackend,
}

impl CacheAside {
    /// Creates a cache-aside store over the given backend.
    #[must_use]
    pub fn new(backend: CacheBackend) -> Self {
        Self { backend }
    }

    /// The underlying backend, for health checks.
    #[must_use]
    pub fn backend(&self) -> &CacheBackend {
        &self.backend
    }

    /// Read a value through the cache.
    ///
    /// On a hit the cached value is returned without touching the store.
    /// On a miss the backing store is read; `Ok(None)` from the store
    /// propagates without populating the cache, while a present value is
    /// cached with the TTL of its volatility class. A cached value that
    /// fails to decode is dropped and treated as a miss.
    ///
    /// # Errors
    ///
    /// Returns [`CacheAsideError::Store`] if the backing store fails and
    /// [`CacheAsideError::Cache`] if the cache itself is unreachable.
    pub async fn read_through<T, E, F, Fut>(
        &self,
        key: &CacheKey,
        volatility: Volatility,
        load: F,
    ) -> Result<Option<T>, CacheAsideError<E>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        if let Some(bytes) = self.backend.get(key.as_str()).await? {
            match rmp_serde::from_slice::<T>(&bytes) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "dropping undecodable cache entry");
                    self.backend.delete(key.as_str()).await?;
                }
            }
        }

        let Some(value) = load().await.map_err(CacheAsideError::Store)? else {
            return Ok(None);
        };

        match rmp_serde::to_vec(&value) {
            Ok(bytes) => {
                self.backend
                    .set(key.as_str(), bytes, volatility.ttl())
                    .await?;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to encode value for cache");
            }
        }

        Ok(Some(value))
    }

    /// Apply a mutation to the backing store, then invalidate.
    ///
    /// `commit` runs first; only upon its success are the given keys
    /// deleted. A commit failure skips invalidation entirely. Invalidation
    /// failures after a successful commit are logged and do not fail the
    /// write; the entry's TTL is the upper bound on the resulting
    /// staleness.
    ///
    /// # Errors
    ///
    /// Returns [`CacheAsideError::Store`] if the commit fails.
    pub async fn write_through<T, E, F, Fut>(
        &self,
        keys: &[CacheKey],
        commit: F,
    ) -> Result<T, CacheAsideError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let value = commit().await.map_err(CacheAsideError::Store)?;

        for key in keys {
            if let Err(e) = self.backend.delete(key.as_str()).await {
                tracing::warn!(key = %key, error = %e, "cache invalidation failed after commit");
            }
        }

        Ok(value)
    }
}
