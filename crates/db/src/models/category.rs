//! Category entity model and DTOs.

use opusdb_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// Full category row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

/// DTO for creating a category.
#[derive(Debug)]
pub struct CreateCategory {
    pub name: String,
    pub slug: String,
}
