use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Idempotent create follow; returns true if a new edge was inserted.
pub async fn create_follow(
    pool: &PgPool,
    follower_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query_as::<_, (Uuid,)>(
        r#"
        INSERT INTO follows (follower_id, author_id)
        VALUES ($1, $2)
        ON CONFLICT (follower_id, author_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(follower_id)
    .bind(author_id)
    .fetch_optional(pool)
    .await?;

    Ok(inserted.is_some())
}

/// Idempotent delete; returns true if an edge was removed.
pub async fn delete_follow(
    pool: &PgPool,
    follower_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE follower_id = $1 AND author_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(author_id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

/// Whether `follower_id` follows `author_id`
pub async fn is_following(
    pool: &PgPool,
    follower_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM follows WHERE follower_id = $1 AND author_id = $2
        ) AS following
        "#,
    )
    .bind(follower_id)
    .bind(author_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<bool, _>("following"))
}

/// Number of users following `author_id`
pub async fn count_followers(pool: &PgPool, author_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM follows WHERE author_id = $1")
        .bind(author_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}

/// Number of authors `follower_id` follows
pub async fn count_following(pool: &PgPool, follower_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM follows WHERE follower_id = $1")
        .bind(follower_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}
