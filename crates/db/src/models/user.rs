//! User entity model and DTOs.

use opusdb_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub bio: String,
    pub is_confirmed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// User representation for API responses. Internal bookkeeping columns
/// (confirmation state, timestamps) stay server-side.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub role: String,
    pub bio: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            bio: user.bio.clone(),
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub role: String,
    pub bio: String,
}

/// DTO for updating an existing user. Only non-`None` fields are applied.
#[derive(Debug, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
}
