//! Repository for the `reviews` table.
//!
//! Every lookup is scoped by the owning title so a review can never be
//! reached through a different title's URL.

use opusdb_core::types::DbId;
use sqlx::PgPool;

use crate::models::review::{CreateReview, Review, UpdateReview};

/// Shared SELECT head: review columns joined with the author's username.
const SELECT_HEAD: &str = "SELECT r.id, r.title_id, r.author_id, u.username AS author, \
     r.text, r.score, r.pub_date \
     FROM reviews r \
     JOIN users u ON u.id = r.author_id";

/// Provides CRUD operations for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a new review, returning its id.
    ///
    /// A second review by the same author on the same title surfaces as a
    /// `uq_reviews_title_author` violation.
    pub async fn create(pool: &PgPool, input: &CreateReview) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO reviews (title_id, author_id, text, score)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(input.title_id)
        .bind(input.author_id)
        .bind(&input.text)
        .bind(input.score)
        .fetch_one(pool)
        .await
    }

    /// Find a review by id, intersected on the owning title. A matching
    /// id under a different title yields `None`.
    pub async fn find_for_title(
        pool: &PgPool,
        title_id: DbId,
        id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("{SELECT_HEAD} WHERE r.id = $2 AND r.title_id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(title_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a title's reviews, newest first.
    pub async fn list_for_title(
        pool: &PgPool,
        title_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "{SELECT_HEAD} WHERE r.title_id = $1 ORDER BY r.pub_date DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(title_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a title's reviews.
    pub async fn count_for_title(pool: &PgPool, title_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE title_id = $1")
            .bind(title_id)
            .fetch_one(pool)
            .await
    }

    /// Update a review. Only non-`None` fields in `input` are applied.
    /// Scoped by title like every other lookup.
    pub async fn update_for_title(
        pool: &PgPool,
        title_id: DbId,
        id: DbId,
        input: &UpdateReview,
    ) -> Result<bool, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE reviews SET
                text = COALESCE($3, text),
                score = COALESCE($4, score)
             WHERE id = $2 AND title_id = $1
             RETURNING id",
        )
        .bind(title_id)
        .bind(id)
        .bind(&input.text)
        .bind(input.score)
        .fetch_optional(pool)
        .await?;
        Ok(updated.is_some())
    }

    /// Delete a review, scoped by title. Comments cascade. Returns `true`
    /// if a row was removed.
    pub async fn delete_for_title(
        pool: &PgPool,
        title_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $2 AND title_id = $1")
            .bind(title_id)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
