//! Handlers for the `/genres` resource.
//!
//! Same shape as categories: list, create, delete-by-slug. Reads are
//! public, writes require admin.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use opusdb_core::error::CoreError;
use opusdb_core::pagination::{clamp_limit, clamp_offset};
use opusdb_core::validate::{validate_name, validate_slug};
use serde::Deserialize;

use opusdb_db::models::genre::{CreateGenre, Genre};
use opusdb_db::repositories::GenreRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{PaginationParams, SearchParams};
use crate::response::Page;
use crate::state::AppState;

/// Request body for `POST /genres`.
#[derive(Debug, Deserialize)]
pub struct CreateGenreRequest {
    pub name: String,
    pub slug: String,
}

/// GET /api/v1/genres
pub async fn list_genres(
    State(state): State<AppState>,
    Query(search): Query<SearchParams>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Page<Genre>>> {
    let limit = clamp_limit(pagination.limit);
    let offset = clamp_offset(pagination.offset);
    let search = search.search.as_deref();

    let count = GenreRepo::count(&state.pool, search).await?;
    let results = GenreRepo::list(&state.pool, search, limit, offset).await?;

    Ok(Json(Page::new(
        "/api/v1/genres",
        count,
        limit,
        offset,
        results,
    )))
}

/// POST /api/v1/genres
pub async fn create_genre(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateGenreRequest>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    validate_name(&input.name).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    validate_slug(&input.slug).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let create_dto = CreateGenre {
        name: input.name,
        slug: input.slug,
    };
    let genre = GenreRepo::create(&state.pool, &create_dto).await?;

    Ok((StatusCode::CREATED, Json(genre)))
}

/// DELETE /api/v1/genres/{slug}
pub async fn delete_genre(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    let deleted = GenreRepo::delete_by_slug(&state.pool, &slug).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Genre",
            key: slug,
        }))
    }
}
