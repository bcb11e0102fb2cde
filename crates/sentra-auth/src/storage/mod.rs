//! Storage traits for identity-domain data.
//!
//! The relational store behind these traits is an external collaborator
//! with a narrow contract: normalized-username lookup, role-membership
//! queries, and atomic create/update for identities and their extended
//! profiles. This crate does not define the storage schema.
//!
//! # Implementations
//!
//! [`MemoryIdentityStorage`] backs tests and the dev server; production
//! deployments supply a relational implementation.

pub mod identity;
pub mod memory;

pub use identity::{IdentityStorage, ProfileStorage};
pub use memory::MemoryIdentityStorage;
