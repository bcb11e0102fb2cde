//! Identity and profile storage traits.
//!
//! Defines the interface for identity persistence operations.
//! Implementations are provided by storage backends.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::{ExtendedProfile, Identity, Role};

/// Storage operations for identities and their role memberships.
#[async_trait]
pub trait IdentityStorage: Send + Sync {
    /// Find an identity by its unique ID.
    ///
    /// Returns `None` if the identity doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_id(&self, identity_id: &str) -> AuthResult<Option<Identity>>;

    /// Find an identity by username.
    ///
    /// The lookup is case-insensitive: implementations must compare the
    /// normalized form (see [`Identity::normalize_username`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<Identity>>;

    /// Create a new identity.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::DuplicateUsername`] if an identity with
    /// the same normalized username already exists, or a storage error if
    /// the operation fails.
    async fn create(&self, identity: &Identity) -> AuthResult<()>;

    /// Update an existing identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity doesn't exist or the storage
    /// operation fails.
    async fn update(&self, identity: &Identity) -> AuthResult<()>;

    /// Fetch the identity's role memberships.
    ///
    /// The set is unordered from the caller's perspective; an identity
    /// with no memberships yields an empty set, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn roles_of(&self, identity_id: &str) -> AuthResult<BTreeSet<Role>>;

    /// Add a role membership to an identity.
    ///
    /// Adding a role the identity already holds is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity doesn't exist or the storage
    /// operation fails.
    async fn assign_role(&self, identity_id: &str, role: Role) -> AuthResult<()>;
}

/// Storage operations for extended profiles.
#[async_trait]
pub trait ProfileStorage: Send + Sync {
    /// Find the profile attached to an identity.
    ///
    /// Returns `None` if no profile exists; absence is only an error for
    /// identities holding a profile-bearing role, and that judgment
    /// belongs to the claims assembler, not the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_identity(&self, identity_id: &str) -> AuthResult<Option<ExtendedProfile>>;

    /// Create a profile for an identity.
    ///
    /// # Errors
    ///
    /// Returns an error if a profile already exists for the identity or
    /// the storage operation fails.
    async fn create(&self, profile: &ExtendedProfile) -> AuthResult<()>;

    /// Update an existing profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile doesn't exist or the storage
    /// operation fails.
    async fn update(&self, profile: &ExtendedProfile) -> AuthResult<()>;
}
