//! End-to-end tests for the auth HTTP surface.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use sentra_server::config::{AppConfig, RootUserConfig};
use sentra_server::{router, AppState};
use tower::ServiceExt;

async fn test_app() -> Router {
    let mut config = AppConfig::default();
    config.auth.session.key = "integration-session-key".to_string();
    config.auth.secret_delivery.key = "integration-delivery-key".to_string();
    config.bootstrap.root_user = Some(RootUserConfig {
        username: "root".to_string(),
        password: "RootPassword1!".to_string(),
        email: None,
    });

    let state = AppState::from_config(&config).await.unwrap();
    router(state)
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, serde_json::Value) {
    call(
        app,
        post_json(
            "/api/auth/login",
            serde_json::json!({ "username": username, "password": password }),
        ),
    )
    .await
}

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let (status, body) = call(
        &app,
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cache_available"], true);
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let app = test_app().await;

    // Known user, wrong password.
    let (status, body) = login(&app, "root", "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Unknown user: identical status and body.
    let (status2, body2) = login(&app, "who", "wrong").await;
    assert_eq!(status2, StatusCode::UNAUTHORIZED);
    assert_eq!(body, body2);
}

#[tokio::test]
async fn test_login_requires_credentials() {
    let app = test_app().await;
    let (status, _) = login(&app, "", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_login_me() {
    let app = test_app().await;

    let (status, _) = call(
        &app,
        post_json(
            "/api/auth/register",
            serde_json::json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "Password1!"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = login(&app, "alice", "Password1!").await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = call(&app, get_with_bearer("/api/auth/me", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["roles"], serde_json::json!(["CommonUser"]));
}

#[tokio::test]
async fn test_me_without_token_is_unauthorized() {
    let app = test_app().await;
    let (status, _) = call(
        &app,
        Request::builder()
            .uri("/api/auth/me")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let app = test_app().await;
    let body = serde_json::json!({
        "username": "bob",
        "email": "bob@example.com",
        "password": "Password1!"
    });

    let (status, _) = call(&app, post_json("/api/auth/register", body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, response) = call(&app, post_json("/api/auth/register", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "username unavailable");
}

#[tokio::test]
async fn test_seed_user_as_root() {
    let app = test_app().await;
    let (_, body) = login(&app, "root", "RootPassword1!").await;
    let token = body["token"].as_str().unwrap().to_string();

    // Without a token the endpoint rejects outright.
    let (status, _) = call(
        &app,
        post_json(
            "/api/auth/seed-users",
            serde_json::json!({
                "role": "SecurityOfficer",
                "email": "officer@example.com",
                "first_name": "Lena",
                "last_name": "Voss"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut request = post_json(
        "/api/auth/seed-users",
        serde_json::json!({
            "role": "SecurityOfficer",
            "email": "officer@example.com",
            "first_name": "Lena",
            "last_name": "Voss"
        }),
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );
    let (status, body) = call(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);

    let username = body["username"].as_str().unwrap();
    assert!(username.starts_with("SecurityOfficerAgent"));
    assert!(body["password_token"].as_str().is_some());
}

#[tokio::test]
async fn test_seed_user_denied_for_common_user() {
    let app = test_app().await;
    call(
        &app,
        post_json(
            "/api/auth/register",
            serde_json::json!({
                "username": "carol",
                "email": "carol@example.com",
                "password": "Password1!"
            }),
        ),
    )
    .await;
    let (_, body) = login(&app, "carol", "Password1!").await;
    let token = body["token"].as_str().unwrap().to_string();

    let mut request = post_json(
        "/api/auth/seed-users",
        serde_json::json!({ "role": "CommonUser", "email": "x@example.com" }),
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );
    let (status, body) = call(&app, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_seed_user_unknown_role_is_rejected() {
    let app = test_app().await;
    let (_, body) = login(&app, "root", "RootPassword1!").await;
    let token = body["token"].as_str().unwrap().to_string();

    let mut request = post_json(
        "/api/auth/seed-users",
        serde_json::json!({ "role": "Overlord", "email": "x@example.com" }),
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );
    let (status, _) = call(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
