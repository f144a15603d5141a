//! Repository for the `genres` table.

use sqlx::PgPool;

use crate::models::genre::{CreateGenre, Genre};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug";

/// Provides create/list/delete operations for genres.
pub struct GenreRepo;

impl GenreRepo {
    /// Insert a new genre, returning the created row.
    ///
    /// Duplicate slugs surface as a `uq_genres_slug` violation.
    pub async fn create(pool: &PgPool, input: &CreateGenre) -> Result<Genre, sqlx::Error> {
        let query = format!("INSERT INTO genres (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Genre>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    /// Find a genre by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Genre>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM genres WHERE slug = $1");
        sqlx::query_as::<_, Genre>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a list of slugs to genre rows, preserving request order.
    /// Returns the first unknown slug as `Err(slug)` so the caller can
    /// produce a field-level validation message.
    pub async fn resolve_slugs(
        pool: &PgPool,
        slugs: &[String],
    ) -> Result<Result<Vec<Genre>, String>, sqlx::Error> {
        let mut genres = Vec::with_capacity(slugs.len());
        for slug in slugs {
            match Self::find_by_slug(pool, slug).await? {
                Some(genre) => genres.push(genre),
                None => return Ok(Err(slug.clone())),
            }
        }
        Ok(Ok(genres))
    }

    /// List genres ordered by slug, optionally filtered by a name
    /// substring.
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Genre>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM genres
             WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
             ORDER BY slug ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Genre>(&query)
            .bind(search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count genres matching the same filter as [`Self::list`].
    pub async fn count(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM genres
             WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')",
        )
        .bind(search)
        .fetch_one(pool)
        .await
    }

    /// Delete a genre by slug. Join rows to titles are removed by the FK
    /// rule. Returns `true` if a row was removed.
    pub async fn delete_by_slug(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM genres WHERE slug = $1")
            .bind(slug)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
