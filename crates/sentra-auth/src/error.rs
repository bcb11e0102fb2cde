//! Authentication and authorization error types.
//!
//! The taxonomy distinguishes errors that are recovered locally
//! (`InvalidCredentials`, `DuplicateUsername`, token errors) from errors
//! that must surface (`ProfileInconsistent`, storage failures) and errors
//! that are fatal at startup (`SigningKeyMissing`).

use std::fmt;

use crate::token::TokenKind;

/// Errors that can occur during authentication and authorization operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The presented username/password pair failed verification.
    ///
    /// Deliberately carries no detail: callers must not be able to
    /// distinguish "no such user" from "wrong password".
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// An identity holds a profile-bearing role but has no extended
    /// profile attached. Indicates a provisioning defect upstream.
    #[error("Extended profile missing for identity: {username}")]
    ProfileInconsistent {
        /// Username of the inconsistent identity.
        username: String,
    },

    /// The configured signing key for a token kind is absent or empty.
    ///
    /// This is a startup/configuration error and should fail process
    /// startup; it is never retried per-request.
    #[error("Signing key missing for {kind} tokens")]
    SigningKeyMissing {
        /// Which token kind lacks its key.
        kind: TokenKind,
    },

    /// The token's expiry has passed.
    #[error("Token expired")]
    TokenExpired,

    /// The token failed signature, structure, or claim validation.
    #[error("Token malformed: {message}")]
    TokenMalformed {
        /// Description of the validation failure.
        message: String,
    },

    /// An identity with the same normalized username already exists.
    ///
    /// The seed-provisioning loop treats this as retryable; every other
    /// caller surfaces it.
    #[error("Duplicate username: {username}")]
    DuplicateUsername {
        /// The username that collided.
        username: String,
    },

    /// An error occurred while reading or writing the identity store.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The auth configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `ProfileInconsistent` error.
    #[must_use]
    pub fn profile_inconsistent(username: impl Into<String>) -> Self {
        Self::ProfileInconsistent {
            username: username.into(),
        }
    }

    /// Creates a new `TokenMalformed` error.
    #[must_use]
    pub fn token_malformed(message: impl Into<String>) -> Self {
        Self::TokenMalformed {
            message: message.into(),
        }
    }

    /// Creates a new `DuplicateUsername` error.
    #[must_use]
    pub fn duplicate_username(username: impl Into<String>) -> Self {
        Self::DuplicateUsername {
            username: username.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a client error (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::TokenExpired
                | Self::TokenMalformed { .. }
                | Self::DuplicateUsername { .. }
        )
    }

    /// Returns `true` if this is a server error (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Returns `true` if this is a token-related error.
    #[must_use]
    pub fn is_token_error(&self) -> bool {
        matches!(self, Self::TokenExpired | Self::TokenMalformed { .. })
    }

    /// Returns `true` if the operation may be retried locally.
    ///
    /// Only the duplicate-username condition is retryable; everything
    /// else aborts its surrounding workflow.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DuplicateUsername { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidCredentials => ErrorCategory::Authentication,
            Self::ProfileInconsistent { .. } => ErrorCategory::Provisioning,
            Self::SigningKeyMissing { .. } => ErrorCategory::Configuration,
            Self::TokenExpired | Self::TokenMalformed { .. } => ErrorCategory::Token,
            Self::DuplicateUsername { .. } => ErrorCategory::Provisioning,
            Self::Storage { .. } => ErrorCategory::Infrastructure,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of authentication/authorization errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Identity verification errors.
    Authentication,
    /// Token validation errors.
    Token,
    /// Account provisioning errors.
    Provisioning,
    /// Infrastructure/storage errors.
    Infrastructure,
    /// Configuration errors.
    Configuration,
    /// Internal server errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::Token => write!(f, "token"),
            Self::Provisioning => write!(f, "provisioning"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Configuration => write!(f, "configuration"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid credentials");

        let err = AuthError::profile_inconsistent("chief42");
        assert_eq!(
            err.to_string(),
            "Extended profile missing for identity: chief42"
        );

        let err = AuthError::SigningKeyMissing {
            kind: TokenKind::Session,
        };
        assert_eq!(err.to_string(), "Signing key missing for session tokens");

        let err = AuthError::duplicate_username("SecurityOfficerAgent000042");
        assert_eq!(
            err.to_string(),
            "Duplicate username: SecurityOfficerAgent000042"
        );
    }

    #[test]
    fn test_invalid_credentials_carries_no_detail() {
        // The rendered message must be identical regardless of cause.
        let no_such_user = AuthError::InvalidCredentials;
        let wrong_password = AuthError::InvalidCredentials;
        assert_eq!(no_such_user.to_string(), wrong_password.to_string());
    }

    #[test]
    fn test_error_predicates() {
        assert!(AuthError::InvalidCredentials.is_client_error());
        assert!(AuthError::TokenExpired.is_token_error());
        assert!(AuthError::token_malformed("bad signature").is_token_error());

        assert!(AuthError::duplicate_username("x").is_retryable());
        assert!(!AuthError::storage("db down").is_retryable());
        assert!(AuthError::storage("db down").is_server_error());

        let fatal = AuthError::SigningKeyMissing {
            kind: TokenKind::SecretDelivery,
        };
        assert!(fatal.is_server_error());
        assert!(!fatal.is_retryable());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            AuthError::InvalidCredentials.category(),
            ErrorCategory::Authentication
        );
        assert_eq!(AuthError::TokenExpired.category(), ErrorCategory::Token);
        assert_eq!(
            AuthError::profile_inconsistent("x").category(),
            ErrorCategory::Provisioning
        );
        assert_eq!(
            AuthError::storage("x").category(),
            ErrorCategory::Infrastructure
        );
        assert_eq!(
            AuthError::SigningKeyMissing {
                kind: TokenKind::Session
            }
            .category(),
            ErrorCategory::Configuration
        );
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Authentication.to_string(), "authentication");
        assert_eq!(ErrorCategory::Provisioning.to_string(), "provisioning");
        assert_eq!(ErrorCategory::Infrastructure.to_string(), "infrastructure");
    }
}
