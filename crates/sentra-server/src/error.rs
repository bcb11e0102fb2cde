//! HTTP error mapping.
//!
//! User-visible behavior is uniform: authentication failures return one
//! rejection body with no detail, authorization failures one forbidden
//! body, and everything else a generic server error. Internal causes go
//! to the log, never to the response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sentra_auth::AuthError;

/// Error type returned by HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Authentication failed or the bearer token was missing/invalid.
    Unauthorized,
    /// The token was valid but the policy denied the request.
    Forbidden,
    /// The request payload was unusable.
    Validation(String),
    /// The requested username is taken.
    UsernameUnavailable,
    /// Anything else; details stay in the log.
    Internal,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenMalformed { .. } => Self::Unauthorized,
            AuthError::DuplicateUsername { .. } => Self::UsernameUnavailable,
            _ => {
                tracing::error!(
                    error = %err,
                    category = %err.category(),
                    "request failed"
                );
                Self::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "invalid credentials".to_string()),
            Self::Forbidden => (StatusCode::FORBIDDEN, "forbidden".to_string()),
            Self::Validation(message) => (StatusCode::BAD_REQUEST, message),
            Self::UsernameUnavailable => {
                (StatusCode::BAD_REQUEST, "username unavailable".to_string())
            }
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failures_map_to_unauthorized() {
        assert!(matches!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from(AuthError::TokenExpired),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from(AuthError::token_malformed("bad")),
            ApiError::Unauthorized
        ));
    }

    #[test]
    fn test_duplicate_username_maps_to_bad_request() {
        assert!(matches!(
            ApiError::from(AuthError::duplicate_username("x")),
            ApiError::UsernameUnavailable
        ));
    }

    #[test]
    fn test_server_side_errors_stay_generic() {
        assert!(matches!(
            ApiError::from(AuthError::storage("db down")),
            ApiError::Internal
        ));
        assert!(matches!(
            ApiError::from(AuthError::profile_inconsistent("chief")),
            ApiError::Internal
        ));
    }
}
