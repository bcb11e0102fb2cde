//! # sentra-cache
//!
//! Cache-aside layer between resource endpoints and the authoritative
//! store.
//!
//! The cache is populated lazily on read-miss and explicitly invalidated
//! on write, never updated in place. Within a single write, the store
//! commit strictly precedes the cache invalidation; across requests the
//! only guarantee is convergence within the TTL window. Callers needing
//! strict consistency read the backing store directly and skip this layer.
//!
//! ## Modules
//!
//! - [`backend`] - Key/value backends: in-process map or Redis
//! - [`keys`] - Cache-key grammar and volatility TTL classes
//! - [`store`] - The read-through / invalidate-on-write wrapper

pub mod backend;
pub mod error;
pub mod keys;
pub mod store;

pub use backend::{CacheBackend, CachedEntry};
pub use error::CacheError;
pub use keys::{CacheKey, Volatility};
pub use store::{CacheAside, CacheAsideError};

/// Type alias for cache-layer results.
pub type CacheResult<T> = Result<T, CacheError>;
