use crate::models::Hashtag;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Create a hashtag; the unique constraint rejects duplicate names
pub async fn create_hashtag(pool: &PgPool, name: &str) -> Result<Hashtag, sqlx::Error> {
    let hashtag = sqlx::query_as::<_, Hashtag>(
        r#"
        INSERT INTO hashtags (name)
        VALUES ($1)
        RETURNING id, name
        "#,
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(hashtag)
}

/// Find a hashtag by ID
pub async fn find_hashtag_by_id(
    pool: &PgPool,
    hashtag_id: Uuid,
) -> Result<Option<Hashtag>, sqlx::Error> {
    let hashtag = sqlx::query_as::<_, Hashtag>(
        "SELECT id, name FROM hashtags WHERE id = $1",
    )
    .bind(hashtag_id)
    .fetch_optional(pool)
    .await?;

    Ok(hashtag)
}

/// Subset of the given IDs that exist in the hashtags table
pub async fn filter_existing_ids(
    pool: &PgPool,
    hashtag_ids: &[Uuid],
) -> Result<Vec<Uuid>, sqlx::Error> {
    let ids: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM hashtags WHERE id = ANY($1)")
        .bind(hashtag_ids)
        .fetch_all(pool)
        .await?;

    Ok(ids)
}

/// List hashtags ordered by name with an optional case-insensitive
/// substring filter
pub async fn list_hashtags(
    pool: &PgPool,
    name: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Hashtag>, sqlx::Error> {
    let hashtags = sqlx::query_as::<_, Hashtag>(
        r#"
        SELECT id, name
        FROM hashtags
        WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
        ORDER BY name
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(name)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(hashtags)
}

/// Count hashtags matching the same filter as list_hashtags
pub async fn count_hashtags(pool: &PgPool, name: Option<&str>) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS count
        FROM hashtags
        WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
        "#,
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<i64, _>("count"))
}

/// Rename a hashtag
pub async fn update_hashtag(
    pool: &PgPool,
    hashtag_id: Uuid,
    name: &str,
) -> Result<Option<Hashtag>, sqlx::Error> {
    let hashtag = sqlx::query_as::<_, Hashtag>(
        r#"
        UPDATE hashtags
        SET name = $2
        WHERE id = $1
        RETURNING id, name
        "#,
    )
    .bind(hashtag_id)
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(hashtag)
}

/// Delete a hashtag; post links cascade
pub async fn delete_hashtag(pool: &PgPool, hashtag_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM hashtags WHERE id = $1")
        .bind(hashtag_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
