//! The fixed role set.
//!
//! Roles form a total order of privilege, top first. Policies are defined
//! as explicit role sets rather than by walking this order at runtime, but
//! the order is what makes every higher policy's set a superset of the one
//! below it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A role in the authorization system.
///
/// The set is closed: roles are provisioned from this enum only, and the
/// variants are listed in descending privilege order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// Top-authority role; satisfies every policy.
    Root,
    /// Administrative role.
    Admin,
    /// Head of the security organization.
    SecurityChief,
    /// Security site manager.
    SecurityManager,
    /// Security shift supervisor.
    SecuritySupervisor,
    /// Front-line security officer.
    SecurityOfficer,
    /// Ordinary authenticated user.
    CommonUser,
}

impl Role {
    /// All roles, in descending privilege order.
    pub const ALL: [Role; 7] = [
        Role::Root,
        Role::Admin,
        Role::SecurityChief,
        Role::SecurityManager,
        Role::SecuritySupervisor,
        Role::SecurityOfficer,
        Role::CommonUser,
    ];

    /// Roles whose holders carry an extended profile.
    ///
    /// These are the operational security roles; an identity holding any
    /// of them is provisioned together with an [`super::ExtendedProfile`].
    pub const PROFILE_BEARING: [Role; 4] = [
        Role::SecurityChief,
        Role::SecurityManager,
        Role::SecuritySupervisor,
        Role::SecurityOfficer,
    ];

    /// Returns the canonical role name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::Admin => "Admin",
            Self::SecurityChief => "SecurityChief",
            Self::SecurityManager => "SecurityManager",
            Self::SecuritySupervisor => "SecuritySupervisor",
            Self::SecurityOfficer => "SecurityOfficer",
            Self::CommonUser => "CommonUser",
        }
    }

    /// Returns `true` if holders of this role carry an extended profile.
    #[must_use]
    pub fn bears_profile(&self) -> bool {
        Self::PROFILE_BEARING.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole {
                name: s.to_string(),
            })
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

/// Error returned when parsing a role name outside the fixed set.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown role: {name}")]
pub struct UnknownRole {
    /// The unrecognized role name.
    pub name: String,
}
