//! Title entity model and DTOs.

use opusdb_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::category::Category;
use crate::models::genre::Genre;

/// Title row as read back from the database, with the owning category
/// joined in and the review-score average computed on the fly. `rating` is
/// `None` for titles without reviews.
#[derive(Debug, Clone, FromRow)]
pub struct TitleRow {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: String,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub rating: Option<f64>,
}

/// Title representation for API responses: nested category object and
/// genre list, plus the derived rating.
#[derive(Debug, Serialize)]
pub struct TitleResponse {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub rating: Option<f64>,
    pub description: String,
    pub category: Option<Category>,
    pub genre: Vec<Genre>,
}

impl TitleRow {
    /// Assemble the API response given the title's genres.
    pub fn into_response(self, genre: Vec<Genre>) -> TitleResponse {
        let category = match (self.category_id, self.category_name, self.category_slug) {
            (Some(id), Some(name), Some(slug)) => Some(Category { id, name, slug }),
            _ => None,
        };
        TitleResponse {
            id: self.id,
            name: self.name,
            year: self.year,
            rating: self.rating,
            description: self.description,
            category,
            genre,
        }
    }
}

/// DTO for creating a title. Category and genres are resolved from slugs
/// to ids by the handler before reaching the repository.
#[derive(Debug)]
pub struct CreateTitle {
    pub name: String,
    pub year: i32,
    pub description: String,
    pub category_id: Option<DbId>,
}

/// DTO for updating a title. Only non-`None` fields are applied; the genre
/// set is replaced separately via `TitleRepo::set_genres`.
#[derive(Debug, Default)]
pub struct UpdateTitle {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
}

/// Optional filters for title listing.
#[derive(Debug, Default)]
pub struct TitleFilter {
    /// Exact category slug.
    pub category: Option<String>,
    /// Exact genre slug (title must carry the genre).
    pub genre: Option<String>,
    /// Case-insensitive name substring.
    pub name: Option<String>,
    /// Exact publication year.
    pub year: Option<i32>,
}
