//! Repository for the `comments` table.
//!
//! Lookups are scoped by the owning review; the review itself is resolved
//! through its title by the caller, completing the parent chain.

use opusdb_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CreateComment};

/// Shared SELECT head: comment columns joined with the author's username.
const SELECT_HEAD: &str = "SELECT c.id, c.review_id, c.author_id, u.username AS author, \
     c.text, c.pub_date \
     FROM comments c \
     JOIN users u ON u.id = c.author_id";

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment, returning its id.
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO comments (review_id, author_id, text)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(input.review_id)
        .bind(input.author_id)
        .bind(&input.text)
        .fetch_one(pool)
        .await
    }

    /// Find a comment by id, intersected on the owning review.
    pub async fn find_for_review(
        pool: &PgPool,
        review_id: DbId,
        id: DbId,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("{SELECT_HEAD} WHERE c.id = $2 AND c.review_id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(review_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a review's comments, newest first.
    pub async fn list_for_review(
        pool: &PgPool,
        review_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "{SELECT_HEAD} WHERE c.review_id = $1 ORDER BY c.pub_date DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(review_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a review's comments.
    pub async fn count_for_review(pool: &PgPool, review_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE review_id = $1")
            .bind(review_id)
            .fetch_one(pool)
            .await
    }

    /// Update a comment's text, scoped by review.
    pub async fn update_for_review(
        pool: &PgPool,
        review_id: DbId,
        id: DbId,
        text: &str,
    ) -> Result<bool, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE comments SET text = $3 WHERE id = $2 AND review_id = $1 RETURNING id",
        )
        .bind(review_id)
        .bind(id)
        .bind(text)
        .fetch_optional(pool)
        .await?;
        Ok(updated.is_some())
    }

    /// Delete a comment, scoped by review. Returns `true` if a row was
    /// removed.
    pub async fn delete_for_review(
        pool: &PgPool,
        review_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $2 AND review_id = $1")
            .bind(review_id)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
