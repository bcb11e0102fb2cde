//! # sentra-auth
//!
//! Authentication and authorization core for the Sentra backend.
//!
//! This crate provides:
//! - Credential verification against argon2id password hashes
//! - Claim-set assembly from role memberships and extended profiles
//! - Signed, time-bounded session and secret-delivery tokens
//! - Hierarchical role policies evaluated as explicit role sets
//! - Collision-resistant seed-identity generation for bulk provisioning
//! - Storage traits for the identity store, plus an in-memory backend
//!
//! ## Overview
//!
//! Every inbound request is authorized by verifying its bearer token and
//! evaluating a named [`Policy`] against the token's role claims. The
//! claim set itself is assembled once, at login, and travels inside the
//! token from then on; nothing here keeps per-session server state.
//!
//! ## Modules
//!
//! - [`config`] - Signing keys, issuers, audiences, token lifetimes
//! - [`credential`] - Username/password verification
//! - [`claims`] - Claim sets and the claims assembler
//! - [`token`] - Token issuance and verification
//! - [`policy`] - Named role policies and the policy evaluator
//! - [`seed`] - Seed-identity generation and provisioning
//! - [`service`] - Login/register/provision orchestration
//! - [`storage`] - Storage traits and the in-memory backend

pub mod claims;
pub mod config;
pub mod credential;
pub mod error;
pub mod policy;
pub mod seed;
pub mod service;
pub mod storage;
pub mod token;
pub mod types;

pub use claims::{ClaimSet, ClaimsAssembler, ProfileClaims};
pub use config::{AuthConfig, SigningConfig};
pub use credential::CredentialVerifier;
pub use error::{AuthError, ErrorCategory};
pub use policy::{Decision, Policy, PolicyEvaluator};
pub use seed::{SeedCredentials, SeedIdentityGenerator};
pub use service::{AuthService, LoginOutcome, ProvisionRequest, ProvisionedAccount};
pub use storage::{IdentityStorage, MemoryIdentityStorage, ProfileStorage};
pub use token::{
    SecretTokenClaims, SessionTokenClaims, SignedToken, SigningKey, TokenIssuer, TokenKind,
};
pub use types::{ExtendedProfile, Identity, IdentityBuilder, Role};

/// Type alias for authentication/authorization results.
pub type AuthResult<T> = Result<T, AuthError>;
