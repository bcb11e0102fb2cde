//! Credential verification.
//!
//! Checks a presented username/password pair against the stored argon2id
//! hash. Every failure mode (unknown username, inactive account, missing
//! hash, wrong password) collapses into the same `InvalidCredentials`
//! error so the response never reveals which condition held.
//!
//! # Security
//!
//! - Hashing uses Argon2id (hybrid mode) with default parameters
//! - Salts are generated using OsRng (cryptographically secure RNG)
//! - Hashes are stored in PHC string format
//! - Verification recomputes the hash with the stored salt/parameters and
//!   compares in constant time (the argon2 verifier's comparison)

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AuthError;
use crate::storage::IdentityStorage;
use crate::types::Identity;
use crate::AuthResult;

/// Hash a password for storage using Argon2id.
///
/// # Errors
///
/// Returns an internal error if hashing fails (rare).
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC-format Argon2 hash.
///
/// Returns `false` for a mismatch or an unparseable hash.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Verifies presented credentials against the identity store.
///
/// A leaf component: no dependencies beyond the identity store, and no
/// side effects on success or failure.
pub struct CredentialVerifier {
    identities: Arc<dyn IdentityStorage>,
}

impl CredentialVerifier {
    /// Creates a new verifier over the given identity store.
    #[must_use]
    pub fn new(identities: Arc<dyn IdentityStorage>) -> Self {
        Self { identities }
    }

    /// Verifies a username/password pair and returns the identity.
    ///
    /// The username lookup is case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for any verification
    /// failure, or a storage error if the lookup itself fails.
    pub async fn verify(&self, username: &str, password: &str) -> AuthResult<Identity> {
        let Some(identity) = self.identities.find_by_username(username).await? else {
            tracing::debug!(username = %username, "login rejected: unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        if !identity.is_active() {
            tracing::debug!(username = %username, "login rejected: inactive account");
            return Err(AuthError::InvalidCredentials);
        }

        let Some(hash) = identity.password_hash.as_deref() else {
            tracing::debug!(username = %username, "login rejected: no password credential");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, hash) {
            tracing::debug!(username = %username, "login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{IdentityStorage, MemoryIdentityStorage};

    async fn store_with_user(username: &str, password: &str) -> Arc<MemoryIdentityStorage> {
        let storage = Arc::new(MemoryIdentityStorage::new());
        let identity = Identity::builder(username, "user@example.com")
            .password_hash(hash_password(password).unwrap())
            .build();
        storage.create(&identity).await.unwrap();
        storage
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_verify_success() {
        let storage = store_with_user("alice", "p4ssw0rd!").await;
        let verifier = CredentialVerifier::new(storage);
        let identity = verifier.verify("alice", "p4ssw0rd!").await.unwrap();
        assert_eq!(identity.username, "alice");
    }

    #[tokio::test]
    async fn test_verify_is_case_insensitive_on_username() {
        let storage = store_with_user("Alice", "p4ssw0rd!").await;
        let verifier = CredentialVerifier::new(storage);
        assert!(verifier.verify("aLiCe", "p4ssw0rd!").await.is_ok());
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_are_indistinguishable() {
        let storage = store_with_user("alice", "p4ssw0rd!").await;
        let verifier = CredentialVerifier::new(storage);

        let wrong = verifier.verify("alice", "wrong").await.unwrap_err();
        let unknown = verifier.verify("mallory", "wrong").await.unwrap_err();

        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_inactive_account_rejected() {
        let storage = Arc::new(MemoryIdentityStorage::new());
        let identity = Identity::builder("ghost", "g@example.com")
            .password_hash(hash_password("p4ssw0rd!").unwrap())
            .active(false)
            .build();
        storage.create(&identity).await.unwrap();

        let verifier = CredentialVerifier::new(storage);
        let err = verifier.verify("ghost", "p4ssw0rd!").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_passwordless_account_rejected() {
        let storage = Arc::new(MemoryIdentityStorage::new());
        storage
            .create(&Identity::new("sso-only", "s@example.com"))
            .await
            .unwrap();

        let verifier = CredentialVerifier::new(storage);
        let err = verifier.verify("sso-only", "anything").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }
}
