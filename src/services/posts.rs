/// Post service - creation, author-gated editing, detail, and comments
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::FeedCache;
use crate::db::{comment_repo, group_repo, post_repo};
use crate::error::{AppError, Result};
use crate::models::{Comment, Post, PostDetail, PostView};

/// A submitted new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    /// Group slug; empty or absent files the post under no group.
    pub group: Option<String>,
    pub image_key: Option<String>,
}

/// A submitted edit. `group` replaces the stored group (absent clears it);
/// an absent `image_key` keeps the stored attachment.
#[derive(Debug, Clone)]
pub struct EditPost {
    pub text: String,
    pub group: Option<String>,
    pub image_key: Option<String>,
}

/// Result of an author-gated operation: either applied, or refused because
/// the actor is not the author (the caller redirects to the read view).
#[derive(Debug)]
pub enum EditOutcome<T> {
    Applied(T),
    NotAuthor { post_id: Uuid },
}

pub struct PostService {
    pool: PgPool,
    cache: Option<Arc<FeedCache>>,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, cache: None }
    }

    pub fn with_cache(pool: PgPool, cache: Arc<FeedCache>) -> Self {
        Self {
            pool,
            cache: Some(cache),
        }
    }

    /// Create a post authored by `author_id`.
    pub async fn create_post(&self, author_id: Uuid, submission: NewPost) -> Result<PostView> {
        let text = validate_text(&submission.text)?;
        let group_id = self.resolve_group(submission.group.as_deref()).await?;

        let post = post_repo::create_post(
            &self.pool,
            author_id,
            text,
            group_id,
            submission.image_key.as_deref(),
        )
        .await?;

        self.invalidate_listings().await;

        self.view_of(post.id).await
    }

    /// Single post with its comments and the author's post count.
    pub async fn post_detail(&self, post_id: Uuid) -> Result<PostDetail> {
        let post = post_repo::find_post_view_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

        let author_post_count = post_repo::count_posts_by_author(&self.pool, post.author_id).await?;
        let comments = comment_repo::list_comments_by_post(&self.pool, post_id).await?;
        let comment_count = comments.len() as i64;

        Ok(PostDetail {
            post,
            author_post_count,
            comments,
            comment_count,
        })
    }

    /// Fetch the editable fields of a post; only the author may read them.
    pub async fn editable_post(&self, post_id: Uuid, actor: Uuid) -> Result<EditOutcome<Post>> {
        let post = post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

        if post.author_id != actor {
            return Ok(EditOutcome::NotAuthor { post_id });
        }

        Ok(EditOutcome::Applied(post))
    }

    /// Apply an edit; only the author may submit one. A non-author leaves
    /// the stored row untouched.
    pub async fn edit_post(
        &self,
        post_id: Uuid,
        actor: Uuid,
        submission: EditPost,
    ) -> Result<EditOutcome<PostView>> {
        let post = post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

        if post.author_id != actor {
            return Ok(EditOutcome::NotAuthor { post_id });
        }

        let text = validate_text(&submission.text)?;
        let group_id = self.resolve_group(submission.group.as_deref()).await?;

        post_repo::update_post(
            &self.pool,
            post_id,
            text,
            group_id,
            submission.image_key.as_deref(),
        )
        .await?;

        self.invalidate_listings().await;

        Ok(EditOutcome::Applied(self.view_of(post_id).await?))
    }

    /// Attach a comment to an existing post.
    pub async fn add_comment(&self, post_id: Uuid, author_id: Uuid, text: &str) -> Result<Comment> {
        let text = validate_text(text)?;

        if post_repo::find_post_by_id(&self.pool, post_id).await?.is_none() {
            return Err(AppError::NotFound(format!("post {}", post_id)));
        }

        let comment = comment_repo::create_comment(&self.pool, post_id, author_id, text).await?;

        Ok(comment)
    }

    async fn view_of(&self, post_id: Uuid) -> Result<PostView> {
        post_repo::find_post_view_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("post {} missing after write", post_id)))
    }

    /// Resolve an optional group slug; unknown slugs are a field error, not
    /// a 404, because they arrive in a submitted form.
    async fn resolve_group(&self, slug: Option<&str>) -> Result<Option<Uuid>> {
        let slug = match slug.map(str::trim) {
            Some(s) if !s.is_empty() => s,
            _ => return Ok(None),
        };

        let group = group_repo::find_group_by_slug(&self.pool, slug)
            .await?
            .ok_or_else(|| AppError::ValidationError {
                field: "group",
                message: format!("unknown group '{}'", slug),
            })?;

        Ok(Some(group.id))
    }

    /// Mutations must not leave stale listings cached; failures degrade to
    /// the TTL window.
    async fn invalidate_listings(&self) {
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.invalidate_global().await {
                tracing::warn!("feed cache invalidation failed: {}", err);
            }
        }
    }
}

/// Post and comment text must be non-empty after trimming.
fn validate_text(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError {
            field: "text",
            message: "must not be empty".to_string(),
        });
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_rejected() {
        assert!(validate_text("").is_err());
        assert!(validate_text("   \n\t").is_err());
    }

    #[test]
    fn text_is_trimmed() {
        assert_eq!(validate_text("  hello  ").unwrap(), "hello");
    }

    #[test]
    fn validation_error_names_the_field() {
        match validate_text("") {
            Err(AppError::ValidationError { field, .. }) => assert_eq!(field, "text"),
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }
}
