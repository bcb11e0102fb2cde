//! In-memory identity storage backend.
//!
//! Backs tests and the dev server. All maps live behind a single
//! `tokio::sync::RwLock` so create/assign sequences observe a consistent
//! view; contention is irrelevant at dev scale.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::AuthError;
use crate::types::{ExtendedProfile, Identity, Role};
use crate::AuthResult;

#[derive(Default)]
struct Inner {
    /// Identities keyed by ID.
    identities: HashMap<String, Identity>,
    /// Normalized username -> identity ID.
    usernames: HashMap<String, String>,
    /// Role memberships keyed by identity ID.
    roles: HashMap<String, BTreeSet<Role>>,
    /// Extended profiles keyed by identity ID.
    profiles: HashMap<String, ExtendedProfile>,
}

/// In-memory implementation of [`super::IdentityStorage`] and
/// [`super::ProfileStorage`].
#[derive(Default)]
pub struct MemoryIdentityStorage {
    inner: RwLock<Inner>,
}

impl MemoryIdentityStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl super::IdentityStorage for MemoryIdentityStorage {
    async fn find_by_id(&self, identity_id: &str) -> AuthResult<Option<Identity>> {
        let inner = self.inner.read().await;
        Ok(inner.identities.get(identity_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AuthResult<Option<Identity>> {
        let normalized = Identity::normalize_username(username);
        let inner = self.inner.read().await;
        Ok(inner
            .usernames
            .get(&normalized)
            .and_then(|id| inner.identities.get(id))
            .cloned())
    }

    async fn create(&self, identity: &Identity) -> AuthResult<()> {
        let normalized = identity.normalized_username();
        let mut inner = self.inner.write().await;
        if inner.usernames.contains_key(&normalized) {
            return Err(AuthError::duplicate_username(&identity.username));
        }
        inner.usernames.insert(normalized, identity.id.clone());
        inner
            .identities
            .insert(identity.id.clone(), identity.clone());
        Ok(())
    }

    async fn update(&self, identity: &Identity) -> AuthResult<()> {
        let mut inner = self.inner.write().await;
        let Some(existing) = inner.identities.get(&identity.id).cloned() else {
            return Err(AuthError::storage(format!(
                "identity not found: {}",
                identity.id
            )));
        };
        let old_normalized = existing.normalized_username();
        let new_normalized = identity.normalized_username();
        if old_normalized != new_normalized {
            if inner.usernames.contains_key(&new_normalized) {
                return Err(AuthError::duplicate_username(&identity.username));
            }
            inner.usernames.remove(&old_normalized);
            inner.usernames.insert(new_normalized, identity.id.clone());
        }
        inner
            .identities
            .insert(identity.id.clone(), identity.clone());
        Ok(())
    }

    async fn roles_of(&self, identity_id: &str) -> AuthResult<BTreeSet<Role>> {
        let inner = self.inner.read().await;
        Ok(inner.roles.get(identity_id).cloned().unwrap_or_default())
    }

    async fn assign_role(&self, identity_id: &str, role: Role) -> AuthResult<()> {
        let mut inner = self.inner.write().await;
        if !inner.identities.contains_key(identity_id) {
            return Err(AuthError::storage(format!(
                "identity not found: {identity_id}"
            )));
        }
        inner
            .roles
            .entry(identity_id.to_string())
            .or_default()
            .insert(role);
        Ok(())
    }
}

#[async_trait]
impl super::ProfileStorage for MemoryIdentityStorage {
    async fn find_by_identity(&self, identity_id: &str) -> AuthResult<Option<ExtendedProfile>> {
        let inner = self.inner.read().await;
        Ok(inner.profiles.get(identity_id).cloned())
    }

    async fn create(&self, profile: &ExtendedProfile) -> AuthResult<()> {
        let mut inner = self.inner.write().await;
        if inner.profiles.contains_key(&profile.identity_id) {
            return Err(AuthError::storage(format!(
                "profile already exists for identity: {}",
                profile.identity_id
            )));
        }
        inner
            .profiles
            .insert(profile.identity_id.clone(), profile.clone());
        Ok(())
    }

    async fn update(&self, profile: &ExtendedProfile) -> AuthResult<()> {
        let mut inner = self.inner.write().await;
        if !inner.profiles.contains_key(&profile.identity_id) {
            return Err(AuthError::storage(format!(
                "profile not found for identity: {}",
                profile.identity_id
            )));
        }
        inner
            .profiles
            .insert(profile.identity_id.clone(), profile.clone());
        Ok(())
    }
}
