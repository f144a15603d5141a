//! Handlers for the `/users` resource.
//!
//! The collection is admin-only and keyed by username; `/users/me` is the
//! self-service profile for any authenticated user.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use opusdb_core::error::CoreError;
use opusdb_core::pagination::{clamp_limit, clamp_offset};
use opusdb_core::roles::{is_valid_role, ROLE_USER};
use opusdb_core::validate::{validate_email, validate_username};
use serde::Deserialize;

use opusdb_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use opusdb_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::{PaginationParams, SearchParams};
use crate::response::Page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub role: Option<String>,
    pub bio: Option<String>,
}

/// Request body for `PATCH /users/{username}`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
}

/// Request body for `PATCH /users/me`. Role and username are deliberately
/// absent: neither is self-serviceable.
#[derive(Debug, Deserialize)]
pub struct UpdateMeRequest {
    pub email: Option<String>,
    pub bio: Option<String>,
}

// ---------------------------------------------------------------------------
// Self-service profile
// ---------------------------------------------------------------------------

/// GET /api/v1/users/me
pub async fn me_get(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> AppResult<Json<UserResponse>> {
    let user = find_principal(&state, auth.user_id).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /api/v1/users/me
pub async fn me_patch(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Json(input): Json<UpdateMeRequest>,
) -> AppResult<Json<UserResponse>> {
    if let Some(email) = &input.email {
        validate_email(email).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    let update = UpdateUser {
        email: input.email,
        bio: input.bio,
        ..UpdateUser::default()
    };

    let user = UserRepo::update(&state.pool, auth.user_id, &update)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    Ok(Json(UserResponse::from(&user)))
}

// ---------------------------------------------------------------------------
// Admin handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/users
///
/// Create a user directly. The account starts unconfirmed; the owner still
/// obtains a token through the signup/confirmation flow.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    validate_username(&input.username)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    validate_email(&input.email).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role = input.role.unwrap_or_else(|| ROLE_USER.to_string());
    if !is_valid_role(&role) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "'{role}' is not a valid role"
        ))));
    }

    let create_dto = CreateUser {
        username: input.username,
        email: input.email,
        role,
        bio: input.bio.unwrap_or_default(),
    };

    let user = UserRepo::create(&state.pool, &create_dto).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /api/v1/users
///
/// List users ordered by username, filterable with `?search=`.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(search): Query<SearchParams>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Page<UserResponse>>> {
    let limit = clamp_limit(pagination.limit);
    let offset = clamp_offset(pagination.offset);
    let search = search.search.as_deref();

    let count = UserRepo::count(&state.pool, search).await?;
    let users = UserRepo::list(&state.pool, search, limit, offset).await?;
    let results = users.iter().map(UserResponse::from).collect();

    Ok(Json(Page::new("/api/v1/users", count, limit, offset, results)))
}

/// GET /api/v1/users/{username}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(username): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = find_by_username(&state, &username).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /api/v1/users/{username}
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(username): Path<String>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    if let Some(new_username) = &input.username {
        validate_username(new_username)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }
    if let Some(email) = &input.email {
        validate_email(email).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }
    if let Some(role) = &input.role {
        if !is_valid_role(role) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "'{role}' is not a valid role"
            ))));
        }
    }

    let user = find_by_username(&state, &username).await?;

    let update = UpdateUser {
        username: input.username,
        email: input.email,
        role: input.role,
        bio: input.bio,
    };

    let updated = UserRepo::update(&state.pool, user.id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            key: username,
        }))?;

    Ok(Json(UserResponse::from(&updated)))
}

/// DELETE /api/v1/users/{username}
///
/// Hard delete; the user's reviews and comments cascade away.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(username): Path<String>,
) -> AppResult<StatusCode> {
    let deleted = UserRepo::delete_by_username(&state.pool, &username).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            key: username,
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the authenticated principal's row. A valid token for a deleted
/// user is treated as unauthorized, not as a missing resource.
async fn find_principal(state: &AppState, user_id: i64) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))
}

async fn find_by_username(state: &AppState, username: &str) -> AppResult<User> {
    UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "User",
                key: username.to_string(),
            })
        })
}
