//! Handlers for the `/categories` resource.
//!
//! Categories support list, create and delete-by-slug only; there is no
//! detail or update endpoint. Reads are public, writes require admin.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use opusdb_core::error::CoreError;
use opusdb_core::pagination::{clamp_limit, clamp_offset};
use opusdb_core::validate::{validate_name, validate_slug};
use serde::Deserialize;

use opusdb_db::models::category::{Category, CreateCategory};
use opusdb_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{PaginationParams, SearchParams};
use crate::response::Page;
use crate::state::AppState;

/// Request body for `POST /categories`.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
}

/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
    Query(search): Query<SearchParams>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Page<Category>>> {
    let limit = clamp_limit(pagination.limit);
    let offset = clamp_offset(pagination.offset);
    let search = search.search.as_deref();

    let count = CategoryRepo::count(&state.pool, search).await?;
    let results = CategoryRepo::list(&state.pool, search, limit, offset).await?;

    Ok(Json(Page::new(
        "/api/v1/categories",
        count,
        limit,
        offset,
        results,
    )))
}

/// POST /api/v1/categories
pub async fn create_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    validate_name(&input.name).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    validate_slug(&input.slug).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let create_dto = CreateCategory {
        name: input.name,
        slug: input.slug,
    };
    let category = CategoryRepo::create(&state.pool, &create_dto).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// DELETE /api/v1/categories/{slug}
///
/// Titles referencing the category survive with a null category.
pub async fn delete_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    let deleted = CategoryRepo::delete_by_slug(&state.pool, &slug).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            key: slug,
        }))
    }
}
