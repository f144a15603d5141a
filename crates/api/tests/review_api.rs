//! HTTP-level integration tests for nested reviews and comments,
//! including the strict parent-chain lookups and ownership rules.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, mint_token, patch_json_auth, post_json, post_json_auth, seed_user,
};
use serde_json::json;
use sqlx::PgPool;

use opusdb_core::types::DbId;
use opusdb_db::models::title::CreateTitle;
use opusdb_db::repositories::TitleRepo;

/// Seed a title directly, returning its id.
async fn seed_title(pool: &PgPool, name: &str) -> DbId {
    TitleRepo::create(
        pool,
        &CreateTitle {
            name: name.to_string(),
            year: 2000,
            description: String::new(),
            category_id: None,
        },
    )
    .await
    .expect("title creation should succeed")
}

/// Post a review as the given user, returning the review id.
async fn seed_review(
    app: &axum::Router,
    title_id: DbId,
    token: &str,
    score: i32,
) -> DbId {
    let response = post_json_auth(
        app,
        &format!("/api/v1/titles/{title_id}/reviews"),
        token,
        json!({"text": "a review", "score": score}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().expect("review id")
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// Authenticated users create reviews; the author comes from the token.
#[sqlx::test(migrations = "../db/migrations")]
async fn review_create_and_get(pool: PgPool) {
    let title_id = seed_title(&pool, "Alpha").await;
    let user = seed_user(&pool, "bob", "user").await;
    let token = mint_token(user.id, &user.role);
    let app = common::build_test_app(pool);

    let created = post_json_auth(
        &app,
        &format!("/api/v1/titles/{title_id}/reviews"),
        &token,
        json!({"text": "great", "score": 9}),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let body = body_json(created).await;
    assert_eq!(body["author"], "bob", "author is the request principal");
    assert_eq!(body["score"], 9);
    let review_id = body["id"].as_i64().unwrap();

    let fetched = get(&app, &format!("/api/v1/titles/{title_id}/reviews/{review_id}")).await;
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(body_json(fetched).await["text"], "great");
}

/// Anonymous clients may read reviews but not write them.
#[sqlx::test(migrations = "../db/migrations")]
async fn review_create_requires_auth(pool: PgPool) {
    let title_id = seed_title(&pool, "Alpha").await;
    let app = common::build_test_app(pool);

    let listed = get(&app, &format!("/api/v1/titles/{title_id}/reviews")).await;
    assert_eq!(listed.status(), StatusCode::OK);

    let response = post_json(
        &app,
        &format!("/api/v1/titles/{title_id}/reviews"),
        json!({"text": "drive-by", "score": 1}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// One review per (author, title): the second attempt is a 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn review_unique_per_author_and_title(pool: PgPool) {
    let title_id = seed_title(&pool, "Alpha").await;
    let user = seed_user(&pool, "bob", "user").await;
    let token = mint_token(user.id, &user.role);
    let app = common::build_test_app(pool);

    seed_review(&app, title_id, &token, 5).await;

    let second = post_json_auth(
        &app,
        &format!("/api/v1/titles/{title_id}/reviews"),
        &token,
        json!({"text": "again", "score": 6}),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

/// Scores outside [1, 10] never reach the database.
#[sqlx::test(migrations = "../db/migrations")]
async fn review_score_bounds(pool: PgPool) {
    let title_id = seed_title(&pool, "Alpha").await;
    let user = seed_user(&pool, "bob", "user").await;
    let token = mint_token(user.id, &user.role);
    let app = common::build_test_app(pool);

    for score in [0, 11, -3] {
        let response = post_json_auth(
            &app,
            &format!("/api/v1/titles/{title_id}/reviews"),
            &token,
            json!({"text": "x", "score": score}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "score {score}");
    }
}

/// A review reached through a title it does not belong to is a 404, for
/// reads and writes alike.
#[sqlx::test(migrations = "../db/migrations")]
async fn review_lookup_is_scoped_by_title(pool: PgPool) {
    let t1 = seed_title(&pool, "Alpha").await;
    let t2 = seed_title(&pool, "Beta").await;
    let user = seed_user(&pool, "bob", "user").await;
    let token = mint_token(user.id, &user.role);
    let app = common::build_test_app(pool);

    let r1 = seed_review(&app, t1, &token, 5).await;

    let wrong_parent = get(&app, &format!("/api/v1/titles/{t2}/reviews/{r1}")).await;
    assert_eq!(wrong_parent.status(), StatusCode::NOT_FOUND);

    let wrong_patch = patch_json_auth(
        &app,
        &format!("/api/v1/titles/{t2}/reviews/{r1}"),
        &token,
        json!({"score": 1}),
    )
    .await;
    assert_eq!(wrong_patch.status(), StatusCode::NOT_FOUND);

    // The right parent still works.
    let right = get(&app, &format!("/api/v1/titles/{t1}/reviews/{r1}")).await;
    assert_eq!(right.status(), StatusCode::OK);
}

/// Authors may edit their own review; other plain users may not;
/// moderators and admins may edit anyone's.
#[sqlx::test(migrations = "../db/migrations")]
async fn review_ownership_rules(pool: PgPool) {
    let title_id = seed_title(&pool, "Alpha").await;
    let author = seed_user(&pool, "bob", "user").await;
    let other = seed_user(&pool, "carol", "user").await;
    let moderator = seed_user(&pool, "mod", "moderator").await;
    let author_token = mint_token(author.id, &author.role);
    let other_token = mint_token(other.id, &other.role);
    let moderator_token = mint_token(moderator.id, &moderator.role);
    let app = common::build_test_app(pool);

    let review_id = seed_review(&app, title_id, &author_token, 5).await;
    let path = format!("/api/v1/titles/{title_id}/reviews/{review_id}");

    let by_other = patch_json_auth(&app, &path, &other_token, json!({"score": 1})).await;
    assert_eq!(by_other.status(), StatusCode::FORBIDDEN);

    let by_author = patch_json_auth(&app, &path, &author_token, json!({"score": 7})).await;
    assert_eq!(by_author.status(), StatusCode::OK);
    assert_eq!(body_json(by_author).await["score"], 7);

    let by_moderator =
        patch_json_auth(&app, &path, &moderator_token, json!({"text": "moderated"})).await;
    assert_eq!(by_moderator.status(), StatusCode::OK);

    let deleted_by_other = delete_auth(&app, &path, &other_token).await;
    assert_eq!(deleted_by_other.status(), StatusCode::FORBIDDEN);

    let deleted = delete_auth(&app, &path, &moderator_token).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// Comment CRUD under the full title -> review chain.
#[sqlx::test(migrations = "../db/migrations")]
async fn comment_create_and_update(pool: PgPool) {
    let title_id = seed_title(&pool, "Alpha").await;
    let user = seed_user(&pool, "bob", "user").await;
    let token = mint_token(user.id, &user.role);
    let app = common::build_test_app(pool);

    let review_id = seed_review(&app, title_id, &token, 5).await;
    let base = format!("/api/v1/titles/{title_id}/reviews/{review_id}/comments");

    let created = post_json_auth(&app, &base, &token, json!({"text": "first!"})).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let body = body_json(created).await;
    assert_eq!(body["author"], "bob");
    let comment_id = body["id"].as_i64().unwrap();

    let patched = patch_json_auth(
        &app,
        &format!("{base}/{comment_id}"),
        &token,
        json!({"text": "edited"}),
    )
    .await;
    assert_eq!(patched.status(), StatusCode::OK);
    assert_eq!(body_json(patched).await["text"], "edited");

    let listed = get(&app, &base).await;
    let body = body_json(listed).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["text"], "edited");
}

/// Given title T1 with review R1 and title T2, comment lookups under
/// (T2, R1) are a 404, never R1's comments.
#[sqlx::test(migrations = "../db/migrations")]
async fn comment_chain_rejects_wrong_title(pool: PgPool) {
    let t1 = seed_title(&pool, "Alpha").await;
    let t2 = seed_title(&pool, "Beta").await;
    let user = seed_user(&pool, "bob", "user").await;
    let token = mint_token(user.id, &user.role);
    let app = common::build_test_app(pool);

    let r1 = seed_review(&app, t1, &token, 5).await;
    let created = post_json_auth(
        &app,
        &format!("/api/v1/titles/{t1}/reviews/{r1}/comments"),
        &token,
        json!({"text": "hello"}),
    )
    .await;
    let comment_id = body_json(created).await["id"].as_i64().unwrap();

    let listed = get(&app, &format!("/api/v1/titles/{t2}/reviews/{r1}/comments")).await;
    assert_eq!(listed.status(), StatusCode::NOT_FOUND);

    let fetched = get(
        &app,
        &format!("/api/v1/titles/{t2}/reviews/{r1}/comments/{comment_id}"),
    )
    .await;
    assert_eq!(fetched.status(), StatusCode::NOT_FOUND);

    let posted = post_json_auth(
        &app,
        &format!("/api/v1/titles/{t2}/reviews/{r1}/comments"),
        &token,
        json!({"text": "smuggled"}),
    )
    .await;
    assert_eq!(posted.status(), StatusCode::NOT_FOUND);
}

/// Comment ownership mirrors review ownership.
#[sqlx::test(migrations = "../db/migrations")]
async fn comment_ownership_rules(pool: PgPool) {
    let title_id = seed_title(&pool, "Alpha").await;
    let author = seed_user(&pool, "bob", "user").await;
    let other = seed_user(&pool, "carol", "user").await;
    let author_token = mint_token(author.id, &author.role);
    let other_token = mint_token(other.id, &other.role);
    let app = common::build_test_app(pool);

    let review_id = seed_review(&app, title_id, &author_token, 5).await;
    let base = format!("/api/v1/titles/{title_id}/reviews/{review_id}/comments");
    let created = post_json_auth(&app, &base, &author_token, json!({"text": "mine"})).await;
    let comment_id = body_json(created).await["id"].as_i64().unwrap();
    let path = format!("{base}/{comment_id}");

    let by_other = patch_json_auth(&app, &path, &other_token, json!({"text": "hijack"})).await;
    assert_eq!(by_other.status(), StatusCode::FORBIDDEN);

    let deleted_by_other = delete_auth(&app, &path, &other_token).await;
    assert_eq!(deleted_by_other.status(), StatusCode::FORBIDDEN);

    let deleted = delete_auth(&app, &path, &author_token).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
}

/// Listing reviews of a missing title is a 404, not an empty page.
#[sqlx::test(migrations = "../db/migrations")]
async fn review_list_missing_title_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(&app, "/api/v1/titles/9999/reviews").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
