//! Handlers for the `/titles` resource.
//!
//! Reads are public and embed the derived rating plus nested category and
//! genre objects; writes require admin. Category and genres arrive as
//! slugs in write bodies and are resolved to ids before touching the
//! titles table.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use opusdb_core::error::CoreError;
use opusdb_core::pagination::{clamp_limit, clamp_offset};
use opusdb_core::types::DbId;
use opusdb_core::validate::validate_name;
use serde::Deserialize;

use opusdb_db::models::genre::Genre;
use opusdb_db::models::title::{CreateTitle, TitleFilter, TitleResponse, UpdateTitle};
use opusdb_db::repositories::{CategoryRepo, GenreRepo, TitleRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{PaginationParams, TitleFilterParams};
use crate::response::Page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /titles`. `category` and `genre` carry slugs.
#[derive(Debug, Deserialize)]
pub struct CreateTitleRequest {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genre: Option<Vec<String>>,
}

/// Request body for `PATCH /titles/{id}`. Absent fields are untouched;
/// a present `genre` list replaces the genre set.
#[derive(Debug, Deserialize)]
pub struct UpdateTitleRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genre: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/titles
///
/// List titles, filterable by category slug, genre slug, name substring
/// and exact year.
pub async fn list_titles(
    State(state): State<AppState>,
    Query(filter): Query<TitleFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Page<TitleResponse>>> {
    let limit = clamp_limit(pagination.limit);
    let offset = clamp_offset(pagination.offset);

    let filter = TitleFilter {
        category: filter.category,
        genre: filter.genre,
        name: filter.name,
        year: filter.year,
    };

    let count = TitleRepo::count(&state.pool, &filter).await?;
    let rows = TitleRepo::list(&state.pool, &filter, limit, offset).await?;

    // One batched query for the genres of every listed title.
    let title_ids: Vec<DbId> = rows.iter().map(|t| t.id).collect();
    let mut genres_by_title: HashMap<DbId, Vec<Genre>> = HashMap::new();
    for tg in TitleRepo::genres_for_titles(&state.pool, &title_ids).await? {
        genres_by_title.entry(tg.title_id).or_default().push(Genre {
            id: tg.id,
            name: tg.name,
            slug: tg.slug,
        });
    }

    let results = rows
        .into_iter()
        .map(|row| {
            let genre = genres_by_title.remove(&row.id).unwrap_or_default();
            row.into_response(genre)
        })
        .collect();

    Ok(Json(Page::new(
        "/api/v1/titles",
        count,
        limit,
        offset,
        results,
    )))
}

/// POST /api/v1/titles
pub async fn create_title(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateTitleRequest>,
) -> AppResult<(StatusCode, Json<TitleResponse>)> {
    validate_name(&input.name).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let category_id = resolve_category(&state, input.category.as_deref()).await?;
    let genre_ids = resolve_genres(&state, input.genre.as_deref()).await?;

    let create_dto = CreateTitle {
        name: input.name,
        year: input.year,
        description: input.description.unwrap_or_default(),
        category_id,
    };
    let id = TitleRepo::create(&state.pool, &create_dto).await?;

    if let Some(ids) = genre_ids {
        TitleRepo::set_genres(&state.pool, id, &ids).await?;
    }

    let response = load_title(&state, id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/titles/{id}
pub async fn get_title(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<TitleResponse>> {
    let response = load_title(&state, id).await?;
    Ok(Json(response))
}

/// PATCH /api/v1/titles/{id}
pub async fn update_title(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTitleRequest>,
) -> AppResult<Json<TitleResponse>> {
    if let Some(name) = &input.name {
        validate_name(name).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    let category_id = resolve_category(&state, input.category.as_deref()).await?;
    let genre_ids = resolve_genres(&state, input.genre.as_deref()).await?;

    let update_dto = UpdateTitle {
        name: input.name,
        year: input.year,
        description: input.description,
        category_id,
    };

    let updated = TitleRepo::update(&state.pool, id, &update_dto).await?;
    if !updated {
        return Err(AppError::Core(CoreError::not_found("Title", id)));
    }

    if let Some(ids) = genre_ids {
        TitleRepo::set_genres(&state.pool, id, &ids).await?;
    }

    let response = load_title(&state, id).await?;
    Ok(Json(response))
}

/// DELETE /api/v1/titles/{id}
///
/// Reviews and their comments cascade away with the title.
pub async fn delete_title(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = TitleRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Title", id)))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a title row and its genres, assembled into the API shape.
async fn load_title(state: &AppState, id: DbId) -> AppResult<TitleResponse> {
    let row = TitleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Title", id)))?;
    let genres = TitleRepo::genres_for_title(&state.pool, id).await?;
    Ok(row.into_response(genres))
}

/// Resolve an optional category slug to its id. Unknown slugs are a
/// validation error, matching the write-serializer contract.
async fn resolve_category(
    state: &AppState,
    slug: Option<&str>,
) -> AppResult<Option<DbId>> {
    match slug {
        None => Ok(None),
        Some(slug) => {
            let category = CategoryRepo::find_by_slug(&state.pool, slug)
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::Validation(format!(
                        "unknown category slug '{slug}'"
                    )))
                })?;
            Ok(Some(category.id))
        }
    }
}

/// Resolve an optional genre slug list to ids, rejecting unknown slugs.
async fn resolve_genres(
    state: &AppState,
    slugs: Option<&[String]>,
) -> AppResult<Option<Vec<DbId>>> {
    match slugs {
        None => Ok(None),
        Some(slugs) => match GenreRepo::resolve_slugs(&state.pool, slugs).await? {
            Ok(genres) => Ok(Some(genres.iter().map(|g| g.id).collect())),
            Err(unknown) => Err(AppError::Core(CoreError::Validation(format!(
                "unknown genre slug '{unknown}'"
            )))),
        },
    }
}
