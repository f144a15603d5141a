//! Handlers for the `/titles/{title_id}/reviews/{review_id}/comments`
//! resource.
//!
//! The parent chain is resolved strictly: the review must belong to the
//! title from the URL, and the comment must belong to that review. Any
//! broken link in the chain is a 404.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use opusdb_core::authz;
use opusdb_core::error::CoreError;
use opusdb_core::pagination::{clamp_limit, clamp_offset};
use opusdb_core::types::DbId;
use serde::Deserialize;

use opusdb_db::models::comment::{Comment, CreateComment};
use opusdb_db::repositories::CommentRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::reviews::find_review;
use crate::middleware::rbac::RequireAuth;
use crate::query::PaginationParams;
use crate::response::Page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for comment creation. Author and review association come
/// from the request context, never the body.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

/// Request body for `PATCH .../comments/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub text: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Page<Comment>>> {
    let review = find_review(&state, title_id, review_id).await?;

    let limit = clamp_limit(pagination.limit);
    let offset = clamp_offset(pagination.offset);

    let count = CommentRepo::count_for_review(&state.pool, review.id).await?;
    let results = CommentRepo::list_for_review(&state.pool, review.id, limit, offset).await?;

    let path = format!("/api/v1/titles/{title_id}/reviews/{review_id}/comments");
    Ok(Json(Page::new(&path, count, limit, offset, results)))
}

/// POST /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    Json(input): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let review = find_review(&state, title_id, review_id).await?;

    let create_dto = CreateComment {
        review_id: review.id,
        author_id: auth.user_id,
        text: input.text,
    };
    let id = CommentRepo::create(&state.pool, &create_dto).await?;

    let comment = find_comment(&state, title_id, review_id, id).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/{id}
pub async fn get_comment(
    State(state): State<AppState>,
    Path((title_id, review_id, id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<Json<Comment>> {
    let comment = find_comment(&state, title_id, review_id, id).await?;
    Ok(Json(comment))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}/comments/{id}
///
/// Author, moderator or admin only.
pub async fn update_comment(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path((title_id, review_id, id)): Path<(DbId, DbId, DbId)>,
    Json(input): Json<UpdateCommentRequest>,
) -> AppResult<Json<Comment>> {
    let comment = find_comment(&state, title_id, review_id, id).await?;
    if !authz::may_modify_content(&auth.role, auth.user_id, comment.author_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author or a moderator may modify this comment".into(),
        )));
    }

    if let Some(text) = &input.text {
        CommentRepo::update_for_review(&state.pool, comment.review_id, id, text).await?;
    }

    let comment = find_comment(&state, title_id, review_id, id).await?;
    Ok(Json(comment))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}/comments/{id}
///
/// Author, moderator or admin only.
pub async fn delete_comment(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path((title_id, review_id, id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    let comment = find_comment(&state, title_id, review_id, id).await?;
    if !authz::may_modify_content(&auth.role, auth.user_id, comment.author_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author or a moderator may delete this comment".into(),
        )));
    }

    CommentRepo::delete_for_review(&state.pool, comment.review_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve a comment through the full title -> review -> comment chain.
async fn find_comment(
    state: &AppState,
    title_id: DbId,
    review_id: DbId,
    id: DbId,
) -> AppResult<Comment> {
    let review = find_review(state, title_id, review_id).await?;
    CommentRepo::find_for_review(&state.pool, review.id, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Comment", id)))
}
