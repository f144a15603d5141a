//! Repository for the `titles` table and its genre join table.
//!
//! Read queries compute the review-score average inline; the rating is
//! never stored.

use opusdb_core::types::DbId;
use sqlx::PgPool;

use crate::models::genre::Genre;
use crate::models::title::{CreateTitle, TitleFilter, TitleRow, UpdateTitle};

/// Shared SELECT head: title columns, joined category, computed rating.
const SELECT_HEAD: &str = "SELECT t.id, t.name, t.year, t.description, t.category_id, \
     c.name AS category_name, c.slug AS category_slug, \
     AVG(r.score)::float8 AS rating \
     FROM titles t \
     LEFT JOIN categories c ON c.id = t.category_id \
     LEFT JOIN reviews r ON r.title_id = t.id";

/// Grouping for the aggregate; `c.id` covers the category columns.
const GROUP_BY: &str = "GROUP BY t.id, c.id";

/// Filter clause with all parameters always bound ($1..$4).
const FILTERS: &str = "($1::text IS NULL OR c.slug = $1) \
     AND ($2::text IS NULL OR EXISTS ( \
         SELECT 1 FROM title_genres tg \
         JOIN genres g ON g.id = tg.genre_id \
         WHERE tg.title_id = t.id AND g.slug = $2)) \
     AND ($3::text IS NULL OR t.name ILIKE '%' || $3 || '%') \
     AND ($4::int4 IS NULL OR t.year = $4)";

/// A genre row tagged with the title that carries it, for batch fetches.
#[derive(Debug, sqlx::FromRow)]
pub struct TitleGenre {
    pub title_id: DbId,
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

/// Provides CRUD operations for titles.
pub struct TitleRepo;

impl TitleRepo {
    /// Insert a new title, returning its id. The full row (with rating and
    /// category join) is read back via [`Self::find_by_id`].
    pub async fn create(pool: &PgPool, input: &CreateTitle) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO titles (name, year, description, category_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(input.category_id)
        .fetch_one(pool)
        .await
    }

    /// Find a title by id, with category and rating.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TitleRow>, sqlx::Error> {
        let query = format!("{SELECT_HEAD} WHERE t.id = $1 {GROUP_BY}");
        sqlx::query_as::<_, TitleRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List titles with optional filters, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TitleRow>, sqlx::Error> {
        let query = format!(
            "{SELECT_HEAD} WHERE {FILTERS} {GROUP_BY} ORDER BY t.id DESC LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, TitleRow>(&query)
            .bind(&filter.category)
            .bind(&filter.genre)
            .bind(&filter.name)
            .bind(filter.year)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count titles matching the same filters as [`Self::list`].
    pub async fn count(pool: &PgPool, filter: &TitleFilter) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM titles t \
             LEFT JOIN categories c ON c.id = t.category_id \
             WHERE {FILTERS}"
        );
        sqlx::query_scalar(&query)
            .bind(&filter.category)
            .bind(&filter.genre)
            .bind(&filter.name)
            .bind(filter.year)
            .fetch_one(pool)
            .await
    }

    /// Update a title. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `false` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTitle,
    ) -> Result<bool, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE titles SET
                name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = COALESCE($4, description),
                category_id = COALESCE($5, category_id)
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(input.category_id)
        .fetch_optional(pool)
        .await?;
        Ok(updated.is_some())
    }

    /// Delete a title. Reviews and comments cascade. Returns `true` if a
    /// row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace the genre set for a title.
    pub async fn set_genres(
        pool: &PgPool,
        title_id: DbId,
        genre_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
            .bind(title_id)
            .execute(&mut *tx)
            .await?;
        for genre_id in genre_ids {
            sqlx::query("INSERT INTO title_genres (title_id, genre_id) VALUES ($1, $2)")
                .bind(title_id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await
    }

    /// Genres attached to a single title, ordered by slug.
    pub async fn genres_for_title(
        pool: &PgPool,
        title_id: DbId,
    ) -> Result<Vec<Genre>, sqlx::Error> {
        sqlx::query_as::<_, Genre>(
            "SELECT g.id, g.name, g.slug FROM genres g
             JOIN title_genres tg ON tg.genre_id = g.id
             WHERE tg.title_id = $1
             ORDER BY g.slug ASC",
        )
        .bind(title_id)
        .fetch_all(pool)
        .await
    }

    /// Genres for a batch of titles in one query, for list responses.
    pub async fn genres_for_titles(
        pool: &PgPool,
        title_ids: &[DbId],
    ) -> Result<Vec<TitleGenre>, sqlx::Error> {
        sqlx::query_as::<_, TitleGenre>(
            "SELECT tg.title_id, g.id, g.name, g.slug FROM genres g
             JOIN title_genres tg ON tg.genre_id = g.id
             WHERE tg.title_id = ANY($1)
             ORDER BY tg.title_id, g.slug ASC",
        )
        .bind(title_ids)
        .fetch_all(pool)
        .await
    }
}
