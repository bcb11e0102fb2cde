//! HTTP routes.

pub mod auth;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(auth::health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/seed-users", post(auth::seed_user))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
