//! Auth endpoints: login, registration, seeded provisioning.

use axum::extract::{FromRequestParts, State};
use axum::http::{header::AUTHORIZATION, request::Parts, StatusCode};
use axum::Json;
use sentra_auth::{Policy, ProvisionRequest, Role, SessionTokenClaims};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ApiError;
use crate::state::AppState;

/// Bearer token extracted from the `Authorization` header.
///
/// Extraction only peels the header; verification happens in the handler
/// via the policy evaluator.
pub struct Bearer(pub String);

impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;
        Ok(Bearer(token.trim().to_string()))
    }
}

/// Authorizes a bearer token against a policy, mapping a denial to 403.
fn authorize(
    state: &AppState,
    bearer: &Bearer,
    policy: Policy,
) -> Result<SessionTokenClaims, ApiError> {
    let (decision, claims) = state.evaluator.authorize(&bearer.0, policy)?;
    if !decision.is_allow() {
        return Err(ApiError::Forbidden);
    }
    Ok(claims)
}

// =============================================================================
// Health
// =============================================================================

/// Health response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok" when the process is serving.
    pub status: &'static str,
    /// Whether the cache service is reachable.
    pub cache_available: bool,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache_available: state.cache.backend().is_available().await,
    })
}

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username (case-insensitive).
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// The signed session token.
    pub token: String,
    /// Token expiry.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if body.username.is_empty() || body.password.is_empty() {
        return Err(ApiError::Validation(
            "username and password are required".to_string(),
        ));
    }

    let outcome = state.auth.login(&body.username, &body.password).await?;
    Ok(Json(LoginResponse {
        token: outcome.token.token,
        expires_at: outcome.token.expires_at,
    }))
}

// =============================================================================
// Registration
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Registration response body.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Confirmation message.
    pub message: &'static str,
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    if body.username.is_empty() || body.email.is_empty() || body.password.is_empty() {
        return Err(ApiError::Validation(
            "username, email and password are required".to_string(),
        ));
    }

    state
        .auth
        .register(&body.username, &body.email, &body.password)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "registration successful",
        }),
    ))
}

// =============================================================================
// Current session
// =============================================================================

/// Claims of the calling session.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// Username claim.
    pub username: String,
    /// Email claim.
    pub email: String,
    /// Role claims.
    pub roles: Vec<Role>,
    /// Given name from the extended profile, if carried.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    /// Family name from the extended profile, if carried.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
}

/// `GET /api/auth/me`
pub async fn me(
    State(state): State<AppState>,
    bearer: Bearer,
) -> Result<Json<MeResponse>, ApiError> {
    let claims = authorize(&state, &bearer, Policy::AllUsers)?;
    Ok(Json(MeResponse {
        username: claims.username,
        email: claims.email,
        roles: claims.roles,
        given_name: claims.given_name,
        family_name: claims.family_name,
    }))
}

// =============================================================================
// Seeded provisioning
// =============================================================================

/// Seeded-account request body.
#[derive(Debug, Deserialize)]
pub struct SeedUserRequest {
    /// Role assigned to the new account.
    pub role: String,
    /// Email address for the new account.
    pub email: String,
    /// Given name for the extended profile, when the role bears one.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name for the extended profile, when the role bears one.
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Seeded-account response body.
#[derive(Debug, Serialize)]
pub struct SeedUserResponse {
    /// Generated username.
    pub username: String,
    /// Secret-delivery token wrapping the generated one-time password.
    pub password_token: String,
    /// Expiry of the delivery token.
    #[serde(with = "time::serde::rfc3339")]
    pub password_token_expires_at: OffsetDateTime,
}

/// `POST /api/auth/seed-users`
///
/// Provisioning `Root` accounts requires the `RootOnly` policy; every
/// other role requires `AdminOnly`.
pub async fn seed_user(
    State(state): State<AppState>,
    bearer: Bearer,
    Json(body): Json<SeedUserRequest>,
) -> Result<(StatusCode, Json<SeedUserResponse>), ApiError> {
    let role: Role = body
        .role
        .parse()
        .map_err(|_| ApiError::Validation(format!("unknown role: {}", body.role)))?;

    let policy = if role == Role::Root {
        Policy::RootOnly
    } else {
        Policy::AdminOnly
    };
    authorize(&state, &bearer, policy)?;

    let account = state
        .auth
        .provision(&ProvisionRequest {
            role,
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SeedUserResponse {
            username: account.identity.username,
            password_token: account.password_token.token,
            password_token_expires_at: account.password_token.expires_at,
        }),
    ))
}
