//! Cache-key grammar and TTL classes.
//!
//! Keys are namespaced by resource type:
//!
//! - item: `{type}:{id}`, e.g. `camera:5`
//! - collection: `{type}`, e.g. `camera`
//! - parent-scoped collection: `{type}:{parent_id}:{child}`, e.g.
//!   `message:7:tags`
//!
//! Invalidation fans out to every key derivable from the written
//! resource: a single-item write covers both the item key and the
//! unscoped collection key, since collection reads denormalize individual
//! items. Parent-scoped collections that denormalize the entity are
//! appended by the caller; every such collection is
//! invalidation-eligible, with no per-endpoint exceptions.

use std::fmt;
use std::time::Duration;

/// A namespaced cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a resource collection: `{type}`.
    #[must_use]
    pub fn collection(resource_type: &str) -> Self {
        Self(resource_type.to_string())
    }

    /// Key for a single resource: `{type}:{id}`.
    #[must_use]
    pub fn item(resource_type: &str, id: impl fmt::Display) -> Self {
        Self(format!("{resource_type}:{id}"))
    }

    /// Key for a collection scoped under a parent:
    /// `{type}:{parent_id}:{child}`.
    #[must_use]
    pub fn scoped_collection(
        resource_type: &str,
        parent_id: impl fmt::Display,
        child: &str,
    ) -> Self {
        Self(format!("{resource_type}:{parent_id}:{child}"))
    }

    /// The invalidation fan-out for a single-item write: the item key
    /// plus the unscoped collection key.
    #[must_use]
    pub fn fan_out(resource_type: &str, id: impl fmt::Display) -> Vec<Self> {
        vec![
            Self::item(resource_type, id),
            Self::collection(resource_type),
        ]
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Volatility class of a cached resource, determining its TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Volatility {
    /// Operational data that changes during normal use.
    Operational,
    /// Reference data that rarely changes.
    Reference,
    /// Ephemeral cross-entity views such as tag or comment listings.
    Ephemeral,
}

impl Volatility {
    /// Time-to-live for entries of this class.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        match self {
            Self::Operational => Duration::from_secs(3600),
            Self::Reference => Duration::from_secs(7 * 24 * 3600),
            Self::Ephemeral => Duration::from_secs(60),
        }
    }
}
