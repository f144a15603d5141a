//! Shared harness for HTTP-level integration tests.
//!
//! Builds the application router with the production middleware stack
//! (via `build_app_router`) against a per-test database, and provides
//! request/response helpers plus fixtures for users and tokens.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use opusdb_api::auth::confirmation::{ConfirmationCodeService, ConfirmationConfig};
use opusdb_api::auth::jwt::{generate_access_token, JwtConfig};
use opusdb_api::config::ServerConfig;
use opusdb_api::router::build_app_router;
use opusdb_api::state::AppState;
use opusdb_db::models::user::{CreateUser, User};
use opusdb_db::repositories::UserRepo;

/// Build a test `ServerConfig` with known secrets.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-jwt-secret".to_string(),
            access_token_expiry_mins: 60,
        },
        confirmation: ConfirmationConfig {
            secret: "integration-test-confirmation-secret".to_string(),
            code_expiry_mins: 60,
        },
    }
}

/// Build the full application router against the given pool, with the
/// same middleware stack production uses. No mailer is attached: signup
/// must succeed without SMTP.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        codes: Arc::new(ConfirmationCodeService::new(config.confirmation.clone())),
        mailer: None,
    };
    build_app_router(state, &config)
}

/// Confirmation-code service matching [`test_config`], for issuing codes
/// directly in tests.
pub fn code_service() -> ConfirmationCodeService {
    ConfirmationCodeService::new(test_config().confirmation)
}

/// Mint an access token for a user without going through the HTTP flow.
pub fn mint_token(user_id: i64, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt)
        .expect("token generation should succeed")
}

/// Create a user directly in the database.
pub async fn seed_user(pool: &PgPool, username: &str, role: &str) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        role: role.to_string(),
        bio: String::new(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.clone()
        .oneshot(request)
        .await
        .expect("request should complete")
}

pub async fn get(app: &Router, path: &str) -> Response<Body> {
    send(app, "GET", path, None, None).await
}

pub async fn get_auth(app: &Router, path: &str, token: &str) -> Response<Body> {
    send(app, "GET", path, Some(token), None).await
}

pub async fn post_json(app: &Router, path: &str, body: serde_json::Value) -> Response<Body> {
    send(app, "POST", path, None, Some(body)).await
}

pub async fn post_json_auth(
    app: &Router,
    path: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, "POST", path, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: &Router,
    path: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, "PATCH", path, Some(token), Some(body)).await
}

pub async fn delete_auth(app: &Router, path: &str, token: &str) -> Response<Body> {
    send(app, "DELETE", path, Some(token), None).await
}

pub async fn delete(app: &Router, path: &str) -> Response<Body> {
    send(app, "DELETE", path, None, None).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
