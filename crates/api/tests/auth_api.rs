//! HTTP-level integration tests for signup and token exchange.

mod common;

use axum::http::StatusCode;
use common::{body_json, code_service, post_json};
use serde_json::json;
use sqlx::PgPool;

use opusdb_api::auth::jwt::validate_token;
use opusdb_db::repositories::UserRepo;

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

/// A fresh (username, email) pair creates an unconfirmed user and echoes
/// the pair back with 200.
#[sqlx::test(migrations = "../db/migrations")]
async fn signup_creates_user(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        &app,
        "/api/v1/auth/signup",
        json!({"username": "bob", "email": "bob@x.com"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["username"], "bob");
    assert_eq!(body["email"], "bob@x.com");

    let user = UserRepo::find_by_username(&pool, "bob")
        .await
        .expect("query should succeed")
        .expect("user should exist");
    assert_eq!(user.role, "user");
    assert!(!user.is_confirmed);
}

/// Repeating signup with the exact same pair is idempotent: still 200,
/// still exactly one row.
#[sqlx::test(migrations = "../db/migrations")]
async fn signup_is_idempotent_for_same_pair(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let body = json!({"username": "bob", "email": "bob@x.com"});

    let first = post_json(&app, "/api/v1/auth/signup", body.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json(&app, "/api/v1/auth/signup", body).await;
    assert_eq!(second.status(), StatusCode::OK);

    let count = UserRepo::count(&pool, Some("bob"))
        .await
        .expect("count should succeed");
    assert_eq!(count, 1, "exactly one row for the pair");
}

/// A username or email already bound to a different account is a 409 and
/// creates no new row.
#[sqlx::test(migrations = "../db/migrations")]
async fn signup_partial_collision_is_conflict(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let ok = post_json(
        &app,
        "/api/v1/auth/signup",
        json!({"username": "bob", "email": "bob@x.com"}),
    )
    .await;
    assert_eq!(ok.status(), StatusCode::OK);

    // Same username, different email.
    let username_taken = post_json(
        &app,
        "/api/v1/auth/signup",
        json!({"username": "bob", "email": "other@x.com"}),
    )
    .await;
    assert_eq!(username_taken.status(), StatusCode::CONFLICT);

    // Same email, different username.
    let email_taken = post_json(
        &app,
        "/api/v1/auth/signup",
        json!({"username": "carol", "email": "bob@x.com"}),
    )
    .await;
    assert_eq!(email_taken.status(), StatusCode::CONFLICT);

    assert!(UserRepo::find_by_username(&pool, "carol")
        .await
        .expect("query should succeed")
        .is_none());
}

/// Field validation failures are 400s with a message.
#[sqlx::test(migrations = "../db/migrations")]
async fn signup_rejects_invalid_fields(pool: PgPool) {
    let app = common::build_test_app(pool);

    for body in [
        json!({"email": "bob@x.com"}),                       // missing username
        json!({"username": "bob"}),                          // missing email
        json!({"username": "has space", "email": "a@x.com"}), // bad pattern
        json!({"username": "me", "email": "a@x.com"}),       // reserved
        json!({"username": "bob", "email": "not-an-email"}), // bad email
    ] {
        let response = post_json(&app, "/api/v1/auth/signup", body.clone()).await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "body {body} should be rejected"
        );
    }
}

// ---------------------------------------------------------------------------
// Token exchange
// ---------------------------------------------------------------------------

/// A valid (username, code) pair yields a JWT carrying the user's id and
/// role, and confirms the account.
#[sqlx::test(migrations = "../db/migrations")]
async fn token_exchange_success(pool: PgPool) {
    let user = common::seed_user(&pool, "bob", "user").await;
    let code = code_service().issue(&user);
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        &app,
        "/api/v1/auth/token",
        json!({"username": "bob", "confirmation_code": code}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let token = body["token"].as_str().expect("token should be a string");

    let claims =
        validate_token(token, &common::test_config().jwt).expect("token should validate");
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.role, "user");

    let refreshed = UserRepo::find_by_id(&pool, user.id)
        .await
        .expect("query should succeed")
        .expect("user should exist");
    assert!(refreshed.is_confirmed, "exchange confirms the account");
}

/// Both fields are required.
#[sqlx::test(migrations = "../db/migrations")]
async fn token_missing_fields_is_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool);

    for body in [
        json!({"username": "bob"}),
        json!({"confirmation_code": "whatever"}),
        json!({}),
    ] {
        let response = post_json(&app, "/api/v1/auth/token", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

/// Unknown usernames are a 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn token_unknown_username_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/auth/token",
        json!({"username": "ghost", "confirmation_code": "whatever"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Wrong codes produce one generic message regardless of what was wrong,
/// so the endpoint leaks nothing about which half of the pair failed.
#[sqlx::test(migrations = "../db/migrations")]
async fn token_wrong_code_is_generic_error(pool: PgPool) {
    let _bob = common::seed_user(&pool, "bob", "user").await;
    let alice = common::seed_user(&pool, "alice", "user").await;
    let service = code_service();
    let alice_code = service.issue(&alice);
    let app = common::build_test_app(pool);

    // Garbage code.
    let garbage = post_json(
        &app,
        "/api/v1/auth/token",
        json!({"username": "bob", "confirmation_code": "wrong"}),
    )
    .await;
    assert_eq!(garbage.status(), StatusCode::BAD_REQUEST);
    let garbage_body = body_json(garbage).await;

    // A real code, but for a different user.
    let stolen = post_json(
        &app,
        "/api/v1/auth/token",
        json!({"username": "bob", "confirmation_code": alice_code}),
    )
    .await;
    assert_eq!(stolen.status(), StatusCode::BAD_REQUEST);
    let stolen_body = body_json(stolen).await;

    assert_eq!(
        garbage_body["error"], stolen_body["error"],
        "failure message must not depend on the cause"
    );
}

/// A successful exchange consumes the code: the same code no longer
/// validates because the confirmation state it was bound to has changed.
#[sqlx::test(migrations = "../db/migrations")]
async fn token_code_is_single_use(pool: PgPool) {
    let user = common::seed_user(&pool, "bob", "user").await;
    let code = code_service().issue(&user);
    let app = common::build_test_app(pool);

    let first = post_json(
        &app,
        "/api/v1/auth/token",
        json!({"username": "bob", "confirmation_code": code.clone()}),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json(
        &app,
        "/api/v1/auth/token",
        json!({"username": "bob", "confirmation_code": code}),
    )
    .await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
}

/// End-to-end: signup, issue a code out-of-band (as the email would), and
/// exchange it for a working token.
#[sqlx::test(migrations = "../db/migrations")]
async fn signup_then_token_flow(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let signup = post_json(
        &app,
        "/api/v1/auth/signup",
        json!({"username": "bob", "email": "bob@x.com"}),
    )
    .await;
    assert_eq!(signup.status(), StatusCode::OK);

    // The mailed code is deterministic for the user's current state.
    let user = UserRepo::find_by_username(&pool, "bob")
        .await
        .expect("query should succeed")
        .expect("user should exist");
    let code = code_service().issue(&user);

    let token = post_json(
        &app,
        "/api/v1/auth/token",
        json!({"username": "bob", "confirmation_code": code}),
    )
    .await;
    assert_eq!(token.status(), StatusCode::OK);
    let body = body_json(token).await;
    assert!(body["token"].is_string());
}
