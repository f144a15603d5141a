//! Review entity model and DTOs.

use opusdb_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Review row joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub title_id: DbId,
    #[serde(skip_serializing)]
    pub author_id: DbId,
    /// Author username, joined from `users`.
    pub author: String,
    pub text: String,
    pub score: i32,
    pub pub_date: Timestamp,
}

/// DTO for creating a review. Author and title come from the request
/// context, never from the body.
#[derive(Debug)]
pub struct CreateReview {
    pub title_id: DbId,
    pub author_id: DbId,
    pub text: String,
    pub score: i32,
}

/// DTO for updating a review. Only non-`None` fields are applied.
#[derive(Debug, Default)]
pub struct UpdateReview {
    pub text: Option<String>,
    pub score: Option<i32>,
}
