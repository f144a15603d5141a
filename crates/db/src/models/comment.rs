//! Comment entity model and DTOs.

use opusdb_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Comment row joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub review_id: DbId,
    #[serde(skip_serializing)]
    pub author_id: DbId,
    /// Author username, joined from `users`.
    pub author: String,
    pub text: String,
    pub pub_date: Timestamp,
}

/// DTO for creating a comment. Author and review come from the request
/// context, never from the body.
#[derive(Debug)]
pub struct CreateComment {
    pub review_id: DbId,
    pub author_id: DbId,
    pub text: String,
}
