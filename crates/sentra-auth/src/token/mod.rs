//! Token issuance and verification.
//!
//! Two token kinds with fully disjoint signing material:
//!
//! - **Session tokens** carry the assembled claim set and authenticate
//!   every subsequent request (30-minute default lifetime).
//! - **Secret-delivery tokens** carry a single opaque secret, used to
//!   transmit a one-time generated password (7-day default lifetime).
//!
//! A verifier rejects the wrong kind structurally: different key,
//! different issuer, different audience.

pub mod issuer;
pub mod jwt;

pub use issuer::{SignedToken, TokenIssuer};
pub use jwt::{SecretTokenClaims, SessionTokenClaims, SigningKey};

use std::fmt;

/// The two token kinds issued by this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Authenticated-session bearer token.
    Session,
    /// One-time secret-delivery token.
    SecretDelivery,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session => write!(f, "session"),
            Self::SecretDelivery => write!(f, "secret-delivery"),
        }
    }
}
