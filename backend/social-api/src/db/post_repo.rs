use crate::models::{Post, PostRow};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

/// Create a new post owned by the requesting user
pub async fn create_post(
    pool: &PgPool,
    author_id: Uuid,
    title: &str,
    content: &str,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (author_id, title, content)
        VALUES ($1, $2, $3)
        RETURNING id, author_id, title, content, image, created_at
        "#,
    )
    .bind(author_id)
    .bind(title)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Find a post by ID
pub async fn find_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, author_id, title, content, image, created_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Find a post by ID with the author's username resolved
pub async fn find_post_row_by_id(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Option<PostRow>, sqlx::Error> {
    let post = sqlx::query_as::<_, PostRow>(
        r#"
        SELECT p.id, p.author_id, u.username AS author, p.title, p.content, p.image, p.created_at
        FROM posts p
        JOIN users u ON u.id = p.author_id
        WHERE p.id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// List posts newest-first with optional case-insensitive substring filters
/// on title and author username
pub async fn list_posts(
    pool: &PgPool,
    title: Option<&str>,
    author: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostRow>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostRow>(
        r#"
        SELECT p.id, p.author_id, u.username AS author, p.title, p.content, p.image, p.created_at
        FROM posts p
        JOIN users u ON u.id = p.author_id
        WHERE ($1::text IS NULL OR p.title ILIKE '%' || $1 || '%')
          AND ($2::text IS NULL OR u.username ILIKE '%' || $2 || '%')
        ORDER BY p.created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(title)
    .bind(author)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count posts matching the same filters as list_posts
pub async fn count_posts(
    pool: &PgPool,
    title: Option<&str>,
    author: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS count
        FROM posts p
        JOIN users u ON u.id = p.author_id
        WHERE ($1::text IS NULL OR p.title ILIKE '%' || $1 || '%')
          AND ($2::text IS NULL OR u.username ILIKE '%' || $2 || '%')
        "#,
    )
    .bind(title)
    .bind(author)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<i64, _>("count"))
}

/// Update title and content; absent options leave the column unchanged
pub async fn update_post(
    pool: &PgPool,
    post_id: Uuid,
    title: Option<&str>,
    content: Option<&str>,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET title = COALESCE($2, title),
            content = COALESCE($3, content)
        WHERE id = $1
        RETURNING id, author_id, title, content, image, created_at
        "#,
    )
    .bind(post_id)
    .bind(title)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Delete a post; comments, likes and hashtag links cascade
pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Record the stored image path for a post
pub async fn set_post_image(
    pool: &PgPool,
    post_id: Uuid,
    image_path: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE posts SET image = $2 WHERE id = $1")
        .bind(post_id)
        .bind(image_path)
        .execute(pool)
        .await?;

    Ok(())
}

/// Posts liked by a user, newest-first
pub async fn list_favorite_posts(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<PostRow>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostRow>(
        r#"
        SELECT p.id, p.author_id, u.username AS author, p.title, p.content, p.image, p.created_at
        FROM posts p
        JOIN users u ON u.id = p.author_id
        JOIN likes l ON l.post_id = p.id
        WHERE l.user_id = $1
        ORDER BY p.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Replace the hashtag set attached to a post
pub async fn set_post_hashtags(
    pool: &PgPool,
    post_id: Uuid,
    hashtag_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM post_hashtags WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

    if !hashtag_ids.is_empty() {
        sqlx::query(
            r#"
            INSERT INTO post_hashtags (post_id, hashtag_id)
            SELECT $1, id FROM hashtags WHERE id = ANY($2)
            "#,
        )
        .bind(post_id)
        .bind(hashtag_ids)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(())
}

/// Hashtag IDs attached to a post
pub async fn get_post_hashtag_ids(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error> {
    let ids: Vec<Uuid> = sqlx::query_scalar(
        r#"
        SELECT ph.hashtag_id
        FROM post_hashtags ph
        JOIN hashtags h ON h.id = ph.hashtag_id
        WHERE ph.post_id = $1
        ORDER BY h.name
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// Hashtag names for multiple posts, grouped by post
pub async fn get_hashtag_names_batch(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<String>>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT ph.post_id, h.name
        FROM post_hashtags ph
        JOIN hashtags h ON h.id = ph.hashtag_id
        WHERE ph.post_id = ANY($1)
        ORDER BY h.name
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    let mut names: HashMap<Uuid, Vec<String>> = HashMap::new();
    for row in rows {
        let post_id: Uuid = row.get("post_id");
        let name: String = row.get("name");
        names.entry(post_id).or_default().push(name);
    }

    Ok(names)
}
