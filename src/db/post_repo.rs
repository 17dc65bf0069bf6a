use crate::models::{Post, PostView};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Create a new post authored by `author_id`
/// Returns the created row
pub async fn create_post(
    pool: &PgPool,
    author_id: Uuid,
    text: &str,
    group_id: Option<Uuid>,
    image_key: Option<&str>,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (author_id, text, group_id, image_key)
        VALUES ($1, $2, $3, $4)
        RETURNING id, author_id, text, image_key, group_id, created_at, updated_at
        "#,
    )
    .bind(author_id)
    .bind(text)
    .bind(group_id)
    .bind(image_key)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Find a post row by ID
pub async fn find_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, author_id, text, image_key, group_id, created_at, updated_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Find a post joined with its author and group
pub async fn find_post_view_by_id(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Option<PostView>, sqlx::Error> {
    let post = sqlx::query_as::<_, PostView>(
        r#"
        SELECT p.id, p.author_id, u.username AS author_username, p.text, p.image_key,
               p.group_id, g.slug AS group_slug, g.title AS group_title,
               p.created_at, p.updated_at
        FROM posts p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN groups g ON g.id = p.group_id
        WHERE p.id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Apply an author-approved edit. `group_id` replaces the stored group
/// (None clears it); a missing `image_key` keeps the stored attachment.
pub async fn update_post(
    pool: &PgPool,
    post_id: Uuid,
    text: &str,
    group_id: Option<Uuid>,
    image_key: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE posts
        SET text = $1, group_id = $2, image_key = COALESCE($3, image_key), updated_at = NOW()
        WHERE id = $4
        "#,
    )
    .bind(text)
    .bind(group_id)
    .bind(image_key)
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// All posts, newest first
pub async fn list_recent_posts(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostView>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostView>(
        r#"
        SELECT p.id, p.author_id, u.username AS author_username, p.text, p.image_key,
               p.group_id, g.slug AS group_slug, g.title AS group_title,
               p.created_at, p.updated_at
        FROM posts p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN groups g ON g.id = p.group_id
        ORDER BY p.created_at DESC, p.id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count all posts
pub async fn count_posts(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM posts")
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}

/// Posts filed under a group, newest first
pub async fn list_posts_by_group(
    pool: &PgPool,
    group_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostView>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostView>(
        r#"
        SELECT p.id, p.author_id, u.username AS author_username, p.text, p.image_key,
               p.group_id, g.slug AS group_slug, g.title AS group_title,
               p.created_at, p.updated_at
        FROM posts p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN groups g ON g.id = p.group_id
        WHERE p.group_id = $1
        ORDER BY p.created_at DESC, p.id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(group_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count posts filed under a group
pub async fn count_posts_by_group(pool: &PgPool, group_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM posts WHERE group_id = $1")
        .bind(group_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}

/// Posts by a single author, newest first
pub async fn list_posts_by_author(
    pool: &PgPool,
    author_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostView>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostView>(
        r#"
        SELECT p.id, p.author_id, u.username AS author_username, p.text, p.image_key,
               p.group_id, g.slug AS group_slug, g.title AS group_title,
               p.created_at, p.updated_at
        FROM posts p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN groups g ON g.id = p.group_id
        WHERE p.author_id = $1
        ORDER BY p.created_at DESC, p.id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(author_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count posts by a single author
pub async fn count_posts_by_author(pool: &PgPool, author_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM posts WHERE author_id = $1")
        .bind(author_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}

/// Posts whose author is followed by `follower_id`, newest first
pub async fn list_followed_posts(
    pool: &PgPool,
    follower_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostView>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostView>(
        r#"
        SELECT p.id, p.author_id, u.username AS author_username, p.text, p.image_key,
               p.group_id, g.slug AS group_slug, g.title AS group_title,
               p.created_at, p.updated_at
        FROM posts p
        JOIN users u ON u.id = p.author_id
        JOIN follows f ON f.author_id = p.author_id
        LEFT JOIN groups g ON g.id = p.group_id
        WHERE f.follower_id = $1
        ORDER BY p.created_at DESC, p.id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(follower_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count posts visible in `follower_id`'s followed-authors feed
pub async fn count_followed_posts(pool: &PgPool, follower_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS count
        FROM posts p
        JOIN follows f ON f.author_id = p.author_id
        WHERE f.follower_id = $1
        "#,
    )
    .bind(follower_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<i64, _>("count"))
}
