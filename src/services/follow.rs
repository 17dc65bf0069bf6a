/// Follow toggle - create or remove a follower -> author edge
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{follow_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::User;

/// Outcome of a follow/unfollow request.
#[derive(Debug)]
pub struct FollowChange {
    pub author: User,
    /// Whether an edge was actually created or removed; false means the
    /// request was already satisfied.
    pub changed: bool,
    pub follower_count: i64,
}

pub struct FollowService {
    pool: PgPool,
}

impl FollowService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent follow. Following yourself is a field error; following an
    /// already-followed author is a no-op.
    pub async fn follow(&self, viewer: Uuid, username: &str) -> Result<FollowChange> {
        let author = self.resolve_author(username).await?;

        if author.id == viewer {
            return Err(AppError::ValidationError {
                field: "author",
                message: "you cannot follow yourself".to_string(),
            });
        }

        let changed = follow_repo::create_follow(&self.pool, viewer, author.id).await?;
        let follower_count = follow_repo::count_followers(&self.pool, author.id).await?;

        Ok(FollowChange {
            author,
            changed,
            follower_count,
        })
    }

    /// Idempotent unfollow; an absent edge is treated as already satisfied.
    pub async fn unfollow(&self, viewer: Uuid, username: &str) -> Result<FollowChange> {
        let author = self.resolve_author(username).await?;

        let changed = follow_repo::delete_follow(&self.pool, viewer, author.id).await?;
        let follower_count = follow_repo::count_followers(&self.pool, author.id).await?;

        Ok(FollowChange {
            author,
            changed,
            follower_count,
        })
    }

    async fn resolve_author(&self, username: &str) -> Result<User> {
        user_repo::find_user_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("author '{}'", username)))
    }
}
