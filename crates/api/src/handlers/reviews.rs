//! Handlers for the `/titles/{title_id}/reviews` resource.
//!
//! Every operation resolves the owning title first; a review id reached
//! through the wrong title is a 404. On create, the author is the
//! authenticated principal and the title association comes from the URL,
//! never from the body.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use opusdb_core::authz;
use opusdb_core::error::CoreError;
use opusdb_core::pagination::{clamp_limit, clamp_offset};
use opusdb_core::types::DbId;
use opusdb_core::validate::validate_score;
use serde::Deserialize;

use opusdb_db::models::review::{CreateReview, Review, UpdateReview};
use opusdb_db::repositories::{ReviewRepo, TitleRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::query::PaginationParams;
use crate::response::Page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /titles/{title_id}/reviews`. There is no author
/// or title field by design.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub text: String,
    pub score: i32,
}

/// Request body for `PATCH /titles/{title_id}/reviews/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub text: Option<String>,
    pub score: Option<i32>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/titles/{title_id}/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Page<Review>>> {
    ensure_title(&state, title_id).await?;

    let limit = clamp_limit(pagination.limit);
    let offset = clamp_offset(pagination.offset);

    let count = ReviewRepo::count_for_title(&state.pool, title_id).await?;
    let results = ReviewRepo::list_for_title(&state.pool, title_id, limit, offset).await?;

    let path = format!("/api/v1/titles/{title_id}/reviews");
    Ok(Json(Page::new(&path, count, limit, offset, results)))
}

/// POST /api/v1/titles/{title_id}/reviews
///
/// One review per (author, title); a second attempt is a 409.
pub async fn create_review(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(title_id): Path<DbId>,
    Json(input): Json<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<Review>)> {
    validate_score(input.score).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    ensure_title(&state, title_id).await?;

    let create_dto = CreateReview {
        title_id,
        author_id: auth.user_id,
        text: input.text,
        score: input.score,
    };
    let id = ReviewRepo::create(&state.pool, &create_dto).await?;

    let review = find_review(&state, title_id, id).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /api/v1/titles/{title_id}/reviews/{id}
pub async fn get_review(
    State(state): State<AppState>,
    Path((title_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Review>> {
    let review = find_review(&state, title_id, id).await?;
    Ok(Json(review))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{id}
///
/// Author, moderator or admin only.
pub async fn update_review(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path((title_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateReviewRequest>,
) -> AppResult<Json<Review>> {
    if let Some(score) = input.score {
        validate_score(score).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    let review = find_review(&state, title_id, id).await?;
    if !authz::may_modify_content(&auth.role, auth.user_id, review.author_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author or a moderator may modify this review".into(),
        )));
    }

    let update_dto = UpdateReview {
        text: input.text,
        score: input.score,
    };
    ReviewRepo::update_for_title(&state.pool, title_id, id, &update_dto).await?;

    let review = find_review(&state, title_id, id).await?;
    Ok(Json(review))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{id}
///
/// Author, moderator or admin only. Comments cascade away.
pub async fn delete_review(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path((title_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let review = find_review(&state, title_id, id).await?;
    if !authz::may_modify_content(&auth.role, auth.user_id, review.author_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author or a moderator may delete this review".into(),
        )));
    }

    ReviewRepo::delete_for_title(&state.pool, title_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// 404 unless the title exists.
async fn ensure_title(state: &AppState, title_id: DbId) -> AppResult<()> {
    TitleRepo::find_by_id(&state.pool, title_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Title", title_id)))?;
    Ok(())
}

/// Resolve a review strictly through its owning title.
pub(crate) async fn find_review(
    state: &AppState,
    title_id: DbId,
    id: DbId,
) -> AppResult<Review> {
    ensure_title(state, title_id).await?;
    ReviewRepo::find_for_title(&state.pool, title_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Review", id)))
}
