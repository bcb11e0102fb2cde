//! JWT encoding and decoding.
//!
//! Both token kinds are compact JWTs signed with HMAC-SHA256 using
//! operator-supplied keys. Verification checks signature, issuer,
//! audience, and expiry in one pass; an expired token maps to
//! [`AuthError::TokenExpired`] and every other failure to
//! [`AuthError::TokenMalformed`].

use std::time::Duration;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::config::SigningConfig;
use crate::error::AuthError;
use crate::types::Role;
use crate::AuthResult;

use super::TokenKind;

/// Signing material for one token kind.
///
/// Owns the encoding/decoding keys plus the issuer/audience pair baked
/// into every token of this kind.
pub struct SigningKey {
    kind: TokenKind,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("kind", &self.kind)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl SigningKey {
    /// Builds signing material from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SigningKeyMissing`] if the configured key is
    /// absent or empty.
    pub fn from_config(kind: TokenKind, config: &SigningConfig) -> AuthResult<Self> {
        let secret = config.key.trim();
        if secret.is_empty() {
            return Err(AuthError::SigningKeyMissing { kind });
        }
        Ok(Self {
            kind,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            lifetime: config.lifetime,
        })
    }

    /// The token kind this key signs.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The `iss` claim value for this kind.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// The `aud` claim value for this kind.
    #[must_use]
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Lifetime from issuance to expiry.
    #[must_use]
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Encodes claims into a signed compact JWT.
    pub(super) fn encode<T: Serialize>(&self, claims: &T) -> AuthResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::internal(format!("token encoding failed: {e}")))
    }

    /// Decodes and validates a compact JWT signed by this key.
    pub(super) fn decode<T: DeserializeOwned>(&self, token: &str) -> AuthResult<T> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        decode::<T>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(map_jwt_error)
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::token_malformed(err.to_string()),
    }
}

/// Claims carried by a session token.
///
/// One claim entry per role; extended-profile fields appear only when the
/// assembled claim set carried them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTokenClaims {
    /// Issuer.
    pub iss: String,

    /// Audience.
    pub aud: String,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Random per-token identifier, for future revocation/audit.
    pub jti: String,

    /// Subject (identity ID).
    pub sub: String,

    /// Username claim.
    pub username: String,

    /// Email claim.
    pub email: String,

    /// Role claims.
    #[serde(default)]
    pub roles: Vec<Role>,

    /// Given name from the extended profile, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    /// Family name from the extended profile, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    /// Hire date from the extended profile, if present.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub hired_at: Option<OffsetDateTime>,
}

impl SessionTokenClaims {
    /// Returns the role claims as a set.
    #[must_use]
    pub fn role_set(&self) -> std::collections::BTreeSet<Role> {
        self.roles.iter().copied().collect()
    }

    /// Returns the expiry as an [`OffsetDateTime`].
    #[must_use]
    pub fn expires_at(&self) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(self.exp).unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }
}

/// Claims carried by a secret-delivery token.
///
/// Nothing beyond the opaque secret and the standard envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretTokenClaims {
    /// Issuer.
    pub iss: String,

    /// Audience.
    pub aud: String,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Random per-token identifier.
    pub jti: String,

    /// The opaque secret being delivered.
    pub secret: String,
}
