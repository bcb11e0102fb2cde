//! Seed-identity generation for bulk-provisioned accounts.
//!
//! Usernames are role name + `Agent` + a six-digit random suffix and are
//! not unique by construction; the provisioning workflow retries on
//! collision. Passwords have a fixed 20-character budget: the role name,
//! one forced uppercase, one forced lowercase, one forced special
//! character, alphanumeric/special fill, and a trailing digit.

use rand::Rng;

/// Alphabet for the password fill section.
const FILL_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890!@#$&?";

/// Special characters eligible for the forced special slot.
const SPECIALS: &[u8] = b"!@#$%^&*()-=_+[]{}|;:',.<>?";

/// Total password length budget.
const PASSWORD_BUDGET: usize = 20;

/// Character slots reserved for the forced classes (upper, lower,
/// special, trailing digit).
const RESERVED_SLOTS: usize = 4;

/// A generated username/password pair for a seeded account.
#[derive(Debug, Clone)]
pub struct SeedCredentials {
    /// Generated username; uniqueness is enforced by the caller's
    /// create-and-retry loop, not here.
    pub username: String,
    /// Generated one-time password.
    pub password: String,
}

/// Generates collision-resistant credentials for bulk-provisioned
/// accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedIdentityGenerator;

impl SeedIdentityGenerator {
    /// Creates a new generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Generates a username for the given role name.
    ///
    /// Format: `{role}Agent{NNNNNN}` with a six-digit numeric suffix.
    /// Collisions are possible and expected to be handled by retrying.
    #[must_use]
    pub fn generate_username(&self, role: &str) -> String {
        let suffix: u32 = rand::thread_rng().gen_range(1..=999_999);
        format!("{role}Agent{suffix:06}")
    }

    /// Generates a password for the given role name.
    ///
    /// The password starts with the role name, carries at least one
    /// uppercase letter, one lowercase letter, one special character and
    /// a trailing digit, and is filled up to the 20-character budget from
    /// a fixed alphanumeric+special alphabet. Role names long enough to
    /// exhaust the budget keep their forced characters and skip the fill.
    #[must_use]
    pub fn generate_password(&self, role: &str) -> String {
        let mut rng = rand::thread_rng();
        let fill_len = PASSWORD_BUDGET.saturating_sub(role.len() + RESERVED_SLOTS);

        let mut password = String::with_capacity(role.len() + RESERVED_SLOTS + fill_len);
        password.push_str(role);
        password.push(rng.gen_range(b'A'..=b'Z') as char);
        password.push(rng.gen_range(b'a'..=b'z') as char);
        password.push(SPECIALS[rng.gen_range(0..SPECIALS.len())] as char);
        for _ in 0..fill_len {
            password.push(FILL_ALPHABET[rng.gen_range(0..FILL_ALPHABET.len())] as char);
        }
        password.push(char::from_digit(rng.gen_range(0..10), 10).unwrap_or('0'));

        password
    }

    /// Generates a full credential pair for the given role name.
    #[must_use]
    pub fn generate(&self, role: &str) -> SeedCredentials {
        SeedCredentials {
            username: self.generate_username(role),
            password: self.generate_password(role),
        }
    }
}
