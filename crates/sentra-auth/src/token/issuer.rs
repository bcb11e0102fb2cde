//! The token issuer.
//!
//! Owns both signing keys and is the only place tokens are minted or
//! verified. Key separation is a deliberate control: even with the
//! session key in hand, an attacker cannot forge a secret-delivery token,
//! and vice versa, since the wrong kind fails signature, issuer, and
//! audience checks all at once.

use time::OffsetDateTime;

use crate::claims::ClaimSet;
use crate::config::AuthConfig;
use crate::AuthResult;

use super::jwt::{SecretTokenClaims, SessionTokenClaims, SigningKey};
use super::TokenKind;

/// A signed, time-bounded token as handed to callers.
#[derive(Debug, Clone)]
pub struct SignedToken {
    /// Compact JWT serialization.
    pub token: String,

    /// Which kind of token this is.
    pub kind: TokenKind,

    /// The per-token random identifier embedded as `jti`.
    pub jti: String,

    /// When the token expires.
    pub expires_at: OffsetDateTime,
}

/// Issues and verifies both token kinds.
pub struct TokenIssuer {
    session: SigningKey,
    secret_delivery: SigningKey,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer").finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Builds the issuer from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::SigningKeyMissing`] if either key is
    /// absent. This is a startup error; construction happens once at
    /// process start and failure is fatal there.
    pub fn from_config(config: &AuthConfig) -> AuthResult<Self> {
        Ok(Self {
            session: SigningKey::from_config(TokenKind::Session, &config.session)?,
            secret_delivery: SigningKey::from_config(
                TokenKind::SecretDelivery,
                &config.secret_delivery,
            )?,
        })
    }

    /// Issues a session token for an assembled claim set.
    ///
    /// Embeds subject, username, email, one claim entry per role, and any
    /// extended-profile fields the claim set carried.
    ///
    /// # Errors
    ///
    /// Returns an internal error if encoding fails.
    pub fn issue_session_token(&self, claims: &ClaimSet) -> AuthResult<SignedToken> {
        let now = OffsetDateTime::now_utc();
        let expires_at = now + self.session.lifetime();
        let jti = uuid::Uuid::new_v4().to_string();

        let profile = claims.profile.as_ref();
        let token_claims = SessionTokenClaims {
            iss: self.session.issuer().to_string(),
            aud: self.session.audience().to_string(),
            exp: expires_at.unix_timestamp(),
            iat: now.unix_timestamp(),
            jti: jti.clone(),
            sub: claims.subject.clone(),
            username: claims.username.clone(),
            email: claims.email.clone(),
            roles: claims.roles.iter().copied().collect(),
            given_name: profile.and_then(|p| p.given_name.clone()),
            family_name: profile.and_then(|p| p.family_name.clone()),
            hired_at: profile.and_then(|p| p.hired_at),
        };

        let token = self.session.encode(&token_claims)?;
        tracing::debug!(subject = %claims.subject, jti = %jti, "session token issued");

        Ok(SignedToken {
            token,
            kind: TokenKind::Session,
            jti,
            expires_at,
        })
    }

    /// Issues a secret-delivery token carrying a single opaque secret.
    ///
    /// # Errors
    ///
    /// Returns an internal error if encoding fails.
    pub fn issue_secret_token(&self, secret: &str) -> AuthResult<SignedToken> {
        let now = OffsetDateTime::now_utc();
        let expires_at = now + self.secret_delivery.lifetime();
        let jti = uuid::Uuid::new_v4().to_string();

        let token_claims = SecretTokenClaims {
            iss: self.secret_delivery.issuer().to_string(),
            aud: self.secret_delivery.audience().to_string(),
            exp: expires_at.unix_timestamp(),
            iat: now.unix_timestamp(),
            jti: jti.clone(),
            secret: secret.to_string(),
        };

        let token = self.secret_delivery.encode(&token_claims)?;
        tracing::debug!(jti = %jti, "secret-delivery token issued");

        Ok(SignedToken {
            token,
            kind: TokenKind::SecretDelivery,
            jti,
            expires_at,
        })
    }

    /// Verifies a session token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::TokenExpired`] past expiry and
    /// [`crate::AuthError::TokenMalformed`] for every other failure,
    /// including tokens signed by the secret-delivery key.
    pub fn verify_session_token(&self, token: &str) -> AuthResult<SessionTokenClaims> {
        self.session.decode(token)
    }

    /// Verifies a secret-delivery token and returns its claims.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::verify_session_token`], with the kinds
    /// swapped.
    pub fn verify_secret_token(&self, token: &str) -> AuthResult<SecretTokenClaims> {
        self.secret_delivery.decode(token)
    }
}
