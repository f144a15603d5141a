//! Genre entity model and DTOs.

use opusdb_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// Full genre row from the `genres` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Genre {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

/// DTO for creating a genre.
#[derive(Debug)]
pub struct CreateGenre {
    pub name: String,
    pub slug: String,
}
