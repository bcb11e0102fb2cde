//! Claim sets and the claims assembler.
//!
//! A [`ClaimSet`] is ephemeral: derived at login, embedded into a session
//! token, and never persisted. The assembler gathers role memberships and,
//! for identities holding an operational security role, the extended
//! profile. A qualifying identity without a profile is a provisioning
//! defect and is reported, not papered over.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AuthError;
use crate::storage::{IdentityStorage, ProfileStorage};
use crate::types::{ExtendedProfile, Identity, Role};
use crate::AuthResult;

/// Extended-profile facts carried in a session token.
///
/// Only non-empty fields are present; an empty string in the profile is
/// omitted rather than carried as a distinct "set but empty" value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileClaims {
    /// Given name, if non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    /// Family name, if non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    /// Hire date, if recorded.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub hired_at: Option<OffsetDateTime>,
}

impl ProfileClaims {
    /// Extracts claims from a profile, eliding empty fields.
    ///
    /// Returns `None` if nothing would be carried at all, keeping the
    /// token minimal.
    #[must_use]
    pub fn from_profile(profile: &ExtendedProfile) -> Option<Self> {
        fn non_empty(value: &str) -> Option<String> {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }

        let claims = Self {
            given_name: non_empty(&profile.first_name),
            family_name: non_empty(&profile.last_name),
            hired_at: profile.hired_at,
        };

        if claims.given_name.is_none() && claims.family_name.is_none() && claims.hired_at.is_none()
        {
            None
        } else {
            Some(claims)
        }
    }
}

/// The canonical claim set for a verified identity.
///
/// Derived once per login; exists only in memory during assembly and
/// inside the signed session token afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSet {
    /// Identity ID (token subject).
    pub subject: String,

    /// Username as stored (original casing).
    pub username: String,

    /// Email address.
    pub email: String,

    /// Role memberships. Unordered as far as callers are concerned.
    pub roles: BTreeSet<Role>,

    /// Extended-profile facts, present only for qualifying identities.
    pub profile: Option<ProfileClaims>,
}

impl ClaimSet {
    /// Returns `true` if the claim set carries the given role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Assembles a [`ClaimSet`] for a verified identity.
///
/// Runs once, during login, and feeds the token issuer.
pub struct ClaimsAssembler {
    identities: Arc<dyn IdentityStorage>,
    profiles: Arc<dyn ProfileStorage>,
}

impl ClaimsAssembler {
    /// Creates a new assembler over the given stores.
    #[must_use]
    pub fn new(identities: Arc<dyn IdentityStorage>, profiles: Arc<dyn ProfileStorage>) -> Self {
        Self {
            identities,
            profiles,
        }
    }

    /// Assembles the claim set for a verified identity.
    ///
    /// Fetches the role set; if it intersects the profile-bearing roles,
    /// also fetches the extended profile.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ProfileInconsistent`] if a profile-bearing
    /// role is present but no profile exists, or a storage error if a
    /// lookup fails.
    pub async fn assemble(&self, identity: &Identity) -> AuthResult<ClaimSet> {
        let roles = self.identities.roles_of(&identity.id).await?;

        let profile = if roles.iter().any(Role::bears_profile) {
            match self.profiles.find_by_identity(&identity.id).await? {
                Some(profile) => ProfileClaims::from_profile(&profile),
                None => {
                    tracing::warn!(
                        username = %identity.username,
                        "profile-bearing role without extended profile"
                    );
                    return Err(AuthError::profile_inconsistent(&identity.username));
                }
            }
        } else {
            None
        };

        Ok(ClaimSet {
            subject: identity.id.clone(),
            username: identity.username.clone(),
            email: identity.email.clone(),
            roles,
            profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryIdentityStorage;
    use time::macros::datetime;

    async fn seeded() -> (Arc<MemoryIdentityStorage>, ClaimsAssembler) {
        let storage = Arc::new(MemoryIdentityStorage::new());
        let assembler = ClaimsAssembler::new(storage.clone(), storage.clone());
        (storage, assembler)
    }

    async fn create_identity(storage: &MemoryIdentityStorage, username: &str) -> Identity {
        let identity = Identity::new(username, format!("{username}@example.com"));
        IdentityStorage::create(storage, &identity).await.unwrap();
        identity
    }

    #[tokio::test]
    async fn test_assemble_common_user_has_no_profile() {
        let (storage, assembler) = seeded().await;
        let identity = create_identity(&storage, "alice").await;
        storage
            .assign_role(&identity.id, Role::CommonUser)
            .await
            .unwrap();

        let claims = assembler.assemble(&identity).await.unwrap();
        assert_eq!(claims.subject, identity.id);
        assert_eq!(claims.username, "alice");
        assert!(claims.has_role(Role::CommonUser));
        assert!(claims.profile.is_none());
    }

    #[tokio::test]
    async fn test_assemble_includes_profile_for_security_role() {
        let (storage, assembler) = seeded().await;
        let identity = create_identity(&storage, "officer7").await;
        storage
            .assign_role(&identity.id, Role::SecurityOfficer)
            .await
            .unwrap();

        let profile = ExtendedProfile::new(&identity.id, "Lena", "Voss")
            .hired_at(datetime!(2023-08-09 14:00 UTC));
        ProfileStorage::create(storage.as_ref(), &profile)
            .await
            .unwrap();

        let claims = assembler.assemble(&identity).await.unwrap();
        let profile_claims = claims.profile.unwrap();
        assert_eq!(profile_claims.given_name.as_deref(), Some("Lena"));
        assert_eq!(profile_claims.family_name.as_deref(), Some("Voss"));
        assert!(profile_claims.hired_at.is_some());
    }

    #[tokio::test]
    async fn test_assemble_elides_empty_profile_fields() {
        let (storage, assembler) = seeded().await;
        let identity = create_identity(&storage, "officer8").await;
        storage
            .assign_role(&identity.id, Role::SecurityOfficer)
            .await
            .unwrap();

        let profile = ExtendedProfile::new(&identity.id, "", "Voss");
        ProfileStorage::create(storage.as_ref(), &profile)
            .await
            .unwrap();

        let claims = assembler.assemble(&identity).await.unwrap();
        let profile_claims = claims.profile.unwrap();
        assert!(profile_claims.given_name.is_none());
        assert_eq!(profile_claims.family_name.as_deref(), Some("Voss"));
    }

    #[tokio::test]
    async fn test_assemble_reports_missing_profile() {
        let (storage, assembler) = seeded().await;
        let identity = create_identity(&storage, "chief1").await;
        storage
            .assign_role(&identity.id, Role::SecurityChief)
            .await
            .unwrap();

        let err = assembler.assemble(&identity).await.unwrap_err();
        assert!(matches!(err, AuthError::ProfileInconsistent { .. }));
    }

    #[tokio::test]
    async fn test_assemble_skips_profile_lookup_for_admin() {
        // Admin does not bear a profile, so a missing profile is fine.
        let (storage, assembler) = seeded().await;
        let identity = create_identity(&storage, "admin1").await;
        storage.assign_role(&identity.id, Role::Admin).await.unwrap();

        let claims = assembler.assemble(&identity).await.unwrap();
        assert!(claims.profile.is_none());
    }

    #[test]
    fn test_profile_claims_all_empty_collapses_to_none() {
        let profile = ExtendedProfile::new("id", "  ", "");
        assert!(ProfileClaims::from_profile(&profile).is_none());
    }
}
