//! Authentication configuration.
//!
//! Signing material is supplied externally at process start. The two token
//! kinds get fully disjoint key/issuer/audience triples so that a
//! secret-delivery token can never be replayed as a session token even if
//! one of the keys leaks. Absent keys are a fatal startup error.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::token::TokenKind;
use crate::AuthResult;

/// Root authentication configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [auth.session]
/// key = "…"
/// issuer = "https://api.sentra.example"
/// audience = "sentra-api"
/// lifetime = "30m"
///
/// [auth.secret_delivery]
/// key = "…"
/// issuer = "https://credentials.sentra.example"
/// audience = "sentra-credential-delivery"
/// lifetime = "7d"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Session-token signing configuration.
    pub session: SigningConfig,

    /// Secret-delivery-token signing configuration.
    pub secret_delivery: SigningConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session: SigningConfig {
                key: String::new(),
                issuer: "https://api.sentra.example".to_string(),
                audience: "sentra-api".to_string(),
                lifetime: Duration::from_secs(30 * 60),
            },
            secret_delivery: SigningConfig {
                key: String::new(),
                issuer: "https://credentials.sentra.example".to_string(),
                audience: "sentra-credential-delivery".to_string(),
                lifetime: Duration::from_secs(7 * 24 * 3600),
            },
        }
    }
}

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SigningKeyMissing`] if either signing key is
    /// absent, and a configuration error for non-disjoint issuer/audience
    /// pairs or a zero lifetime.
    pub fn validate(&self) -> AuthResult<()> {
        self.session.validate(TokenKind::Session)?;
        self.secret_delivery.validate(TokenKind::SecretDelivery)?;

        if self.session.issuer == self.secret_delivery.issuer {
            return Err(AuthError::configuration(
                "session and secret-delivery issuers must be disjoint",
            ));
        }
        if self.session.audience == self.secret_delivery.audience {
            return Err(AuthError::configuration(
                "session and secret-delivery audiences must be disjoint",
            ));
        }
        Ok(())
    }
}

/// Signing configuration for one token kind.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SigningConfig {
    /// HMAC-SHA256 signing key. Required; absence is fatal at startup.
    #[serde(default)]
    pub key: String,

    /// Value of the `iss` claim.
    pub issuer: String,

    /// Value of the `aud` claim.
    pub audience: String,

    /// Token lifetime from issuance to expiry.
    #[serde(with = "humantime_serde")]
    pub lifetime: Duration,
}

impl SigningConfig {
    fn validate(&self, kind: TokenKind) -> AuthResult<()> {
        if self.key.trim().is_empty() {
            return Err(AuthError::SigningKeyMissing { kind });
        }
        if self.issuer.is_empty() || self.audience.is_empty() {
            return Err(AuthError::configuration(format!(
                "issuer and audience are required for {kind} tokens"
            )));
        }
        if self.lifetime.is_zero() {
            return Err(AuthError::configuration(format!(
                "lifetime must be non-zero for {kind} tokens"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> AuthConfig {
        let mut config = AuthConfig::default();
        config.session.key = "session-signing-key".to_string();
        config.secret_delivery.key = "secret-delivery-signing-key".to_string();
        config
    }

    #[test]
    fn test_default_lifetimes() {
        let config = AuthConfig::default();
        assert_eq!(config.session.lifetime, Duration::from_secs(1800));
        assert_eq!(
            config.secret_delivery.lifetime,
            Duration::from_secs(7 * 24 * 3600)
        );
    }

    #[test]
    fn test_validate_ok() {
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn test_missing_session_key_is_fatal() {
        let mut config = configured();
        config.session.key = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            AuthError::SigningKeyMissing {
                kind: TokenKind::Session
            }
        ));
    }

    #[test]
    fn test_missing_secret_delivery_key_is_fatal() {
        let mut config = configured();
        config.secret_delivery.key = String::new();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            AuthError::SigningKeyMissing {
                kind: TokenKind::SecretDelivery
            }
        ));
    }

    #[test]
    fn test_issuers_must_be_disjoint() {
        let mut config = configured();
        config.secret_delivery.issuer = config.session.issuer.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_lifetime_parses_humantime() {
        let toml = r#"
            [session]
            key = "k1"
            issuer = "https://a"
            audience = "aud-a"
            lifetime = "30m"

            [secret_delivery]
            key = "k2"
            issuer = "https://b"
            audience = "aud-b"
            lifetime = "7d"
        "#;
        let config: AuthConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.session.lifetime, Duration::from_secs(1800));
        assert_eq!(
            config.secret_delivery.lifetime,
            Duration::from_secs(604_800)
        );
    }
}
