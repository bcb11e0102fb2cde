//! Extended profile attached to operational security identities.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Supplementary attributes attached 1:1 to identities holding one of the
/// profile-bearing roles.
///
/// Created together with the identity when such a role is assigned. Its
/// absence for a non-qualifying identity is normal; its absence for a
/// qualifying identity is a provisioning defect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendedProfile {
    /// The owning identity's ID.
    pub identity_id: String,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Whether the profile holder is an active employee.
    pub active: bool,

    /// Hire date, if recorded.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub hired_at: Option<OffsetDateTime>,

    /// Termination date, if the holder has left.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub terminated_at: Option<OffsetDateTime>,
}

impl ExtendedProfile {
    /// Creates a new active profile for the given identity.
    #[must_use]
    pub fn new(
        identity_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            identity_id: identity_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            active: true,
            hired_at: None,
            terminated_at: None,
        }
    }

    /// Sets the hire date.
    #[must_use]
    pub fn hired_at(mut self, hired_at: OffsetDateTime) -> Self {
        self.hired_at = Some(hired_at);
        self
    }

    /// Returns the display name, with whitespace-only parts elided.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        match (first.is_empty(), last.is_empty()) {
            (true, true) => None,
            (false, true) => Some(first.to_string()),
            (true, false) => Some(last.to_string()),
            (false, false) => Some(format!("{first} {last}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let profile = ExtendedProfile::new("id-1", "Trinity", "Moss");
        assert_eq!(profile.display_name().as_deref(), Some("Trinity Moss"));

        let profile = ExtendedProfile::new("id-2", "  ", "Moss");
        assert_eq!(profile.display_name().as_deref(), Some("Moss"));

        let profile = ExtendedProfile::new("id-3", " ", "");
        assert!(profile.display_name().is_none());
    }
}
