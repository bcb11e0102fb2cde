//! # sentra-server
//!
//! Process wiring for the Sentra backend: configuration loading, tracing
//! initialization, application-state assembly, and the thin auth HTTP
//! surface.
//!
//! The wider product's repetitive resource controllers live elsewhere;
//! this crate carries the startup surface (signing keys, cache
//! connection; absent configuration is fatal here, never per-request)
//! and the login/provisioning endpoints that exercise the auth core.

pub mod config;
pub mod error;
pub mod observability;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
