//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped via `opusdb_core::pagination` before use.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Substring search parameter (`?search=`) used by categories, genres and
/// the admin users listing.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

/// Title listing filters (`?category=&genre=&name=&year=`).
#[derive(Debug, Deserialize)]
pub struct TitleFilterParams {
    /// Exact category slug.
    pub category: Option<String>,
    /// Exact genre slug.
    pub genre: Option<String>,
    /// Case-insensitive name substring.
    pub name: Option<String>,
    /// Exact publication year.
    pub year: Option<i32>,
}
