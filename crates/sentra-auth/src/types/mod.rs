//! Core identity-domain types.

pub mod identity;
pub mod profile;
pub mod role;

pub use identity::{Identity, IdentityBuilder};
pub use profile::ExtendedProfile;
pub use role::{Role, UnknownRole};
