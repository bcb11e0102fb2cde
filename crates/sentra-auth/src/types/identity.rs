//! Identity type and builder.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Default datetime value for deserialization when a field is missing.
fn default_datetime() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// An identity in the authentication system.
///
/// Identities authenticate with a username/password pair and obtain
/// session tokens carrying their role claims. Username uniqueness is
/// case-insensitive: all lookups go through [`Identity::normalized_username`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Unique identifier (UUID string).
    #[serde(default)]
    pub id: String,

    /// Username for authentication. Unique under case normalization.
    pub username: String,

    /// Email address.
    pub email: String,

    /// Argon2id password hash in PHC string format.
    ///
    /// Stored for password authentication; filter this field out manually
    /// when exposing an identity via API.
    #[serde(default, alias = "passwordHash")]
    pub password_hash: Option<String>,

    /// Whether the email address has been confirmed.
    #[serde(default)]
    pub email_confirmed: bool,

    /// Whether the account is active. Inactive identities cannot
    /// authenticate.
    pub active: bool,

    /// When the identity was created.
    #[serde(default = "default_datetime", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// When the identity was last updated.
    #[serde(default = "default_datetime", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Identity {
    /// Creates a new active identity with the given username and email.
    ///
    /// A new UUID is generated as the ID; no password is set.
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.into(),
            email: email.into(),
            password_hash: None,
            email_confirmed: false,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a new identity builder.
    #[must_use]
    pub fn builder(username: impl Into<String>, email: impl Into<String>) -> IdentityBuilder {
        IdentityBuilder::new(username, email)
    }

    /// Returns the case-normalized form of a username.
    ///
    /// All storage lookups and uniqueness checks use this form.
    #[must_use]
    pub fn normalize_username(username: &str) -> String {
        username.trim().to_lowercase()
    }

    /// Returns this identity's case-normalized username.
    #[must_use]
    pub fn normalized_username(&self) -> String {
        Self::normalize_username(&self.username)
    }

    /// Returns `true` if the account is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Builder for creating [`Identity`] instances.
pub struct IdentityBuilder {
    identity: Identity,
}

impl IdentityBuilder {
    fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            identity: Identity::new(username, email),
        }
    }

    /// Sets the identity ID.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.identity.id = id.into();
        self
    }

    /// Sets the password hash.
    #[must_use]
    pub fn password_hash(mut self, hash: impl Into<String>) -> Self {
        self.identity.password_hash = Some(hash.into());
        self
    }

    /// Marks the email address as confirmed.
    #[must_use]
    pub fn email_confirmed(mut self, confirmed: bool) -> Self {
        self.identity.email_confirmed = confirmed;
        self
    }

    /// Sets whether the account is active.
    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.identity.active = active;
        self
    }

    /// Builds the identity.
    #[must_use]
    pub fn build(self) -> Identity {
        self.identity
    }
}
