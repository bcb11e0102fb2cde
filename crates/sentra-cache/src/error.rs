//! Cache-layer error types.

/// Errors that can occur talking to or encoding for the cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cache service could not be reached or the call failed.
    ///
    /// Surfaced to callers as a generic unavailable condition; never
    /// silently converted into a cache miss.
    #[error("Cache unavailable: {message}")]
    Unavailable {
        /// Description of the transport failure.
        message: String,
    },

    /// A cached value could not be encoded or decoded.
    #[error("Cache codec error: {message}")]
    Codec {
        /// Description of the codec failure.
        message: String,
    },
}

impl CacheError {
    /// Creates a new `Unavailable` error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a new `Codec` error.
    #[must_use]
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CacheError::unavailable("connection refused");
        assert_eq!(err.to_string(), "Cache unavailable: connection refused");

        let err = CacheError::codec("truncated payload");
        assert_eq!(err.to_string(), "Cache codec error: truncated payload");
    }
}
