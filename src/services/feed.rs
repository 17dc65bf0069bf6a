/// Feed assembly - resolves a scope to an ordered, paginated page of posts
///
/// Every scope shares the same ordering (newest first) and the same
/// paginator. The global scope additionally reads through the listing
/// cache; cache failures degrade to recomputation.
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::FeedCache;
use crate::db::{follow_repo, group_repo, post_repo, user_repo};
use crate::error::{AppError, Result};
use crate::metrics::feed::FEED_REQUEST_TOTAL;
use crate::models::{FeedPage, GroupFeed, PostView, ProfileFeed};
use crate::services::pagination::{PageWindow, Pager};

pub struct FeedService {
    pool: PgPool,
    cache: Option<Arc<FeedCache>>,
    page_size: i64,
}

impl FeedService {
    pub fn new(pool: PgPool, page_size: i64) -> Self {
        Self {
            pool,
            cache: None,
            page_size,
        }
    }

    pub fn with_cache(pool: PgPool, cache: Arc<FeedCache>, page_size: i64) -> Self {
        Self {
            pool,
            cache: Some(cache),
            page_size,
        }
    }

    /// Global scope: all posts.
    pub async fn global_feed(&self, requested_page: i64) -> Result<FeedPage> {
        FEED_REQUEST_TOTAL.with_label_values(&["global"]).inc();

        let probe = requested_page.max(1);
        if let Some(cache) = &self.cache {
            if cache.covers_page(probe) {
                match cache.read_page(probe).await {
                    Ok(Some(page)) => return Ok(page),
                    Ok(None) => {}
                    Err(err) => tracing::debug!("feed cache read failed: {}", err),
                }
            }
        }

        let total = post_repo::count_posts(&self.pool).await?;
        let window = Pager::new(total, self.page_size).window(requested_page);
        let posts = post_repo::list_recent_posts(&self.pool, window.limit, window.offset).await?;
        let page = assemble_page(posts, window);

        if let Some(cache) = &self.cache {
            if cache.covers_page(probe) {
                if let Err(err) = cache.write_page(probe, &page).await {
                    tracing::debug!("feed cache write failed: {}", err);
                }
            }
        }

        Ok(page)
    }

    /// Group scope: posts filed under the group named by `slug`.
    pub async fn group_feed(&self, slug: &str, requested_page: i64) -> Result<GroupFeed> {
        FEED_REQUEST_TOTAL.with_label_values(&["group"]).inc();

        let group = group_repo::find_group_by_slug(&self.pool, slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("group '{}'", slug)))?;

        let total = post_repo::count_posts_by_group(&self.pool, group.id).await?;
        let window = Pager::new(total, self.page_size).window(requested_page);
        let posts =
            post_repo::list_posts_by_group(&self.pool, group.id, window.limit, window.offset)
                .await?;

        Ok(GroupFeed {
            group,
            feed: assemble_page(posts, window),
        })
    }

    /// Author scope: posts by the author named by `username`, with the
    /// author's totals and the viewer's follow state.
    pub async fn author_feed(
        &self,
        username: &str,
        viewer: Option<Uuid>,
        requested_page: i64,
    ) -> Result<ProfileFeed> {
        FEED_REQUEST_TOTAL.with_label_values(&["author"]).inc();

        let author = user_repo::find_user_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("author '{}'", username)))?;

        let post_count = post_repo::count_posts_by_author(&self.pool, author.id).await?;
        let follower_count = follow_repo::count_followers(&self.pool, author.id).await?;
        let following_count = follow_repo::count_following(&self.pool, author.id).await?;

        let following = match viewer {
            Some(viewer_id) => follow_repo::is_following(&self.pool, viewer_id, author.id).await?,
            None => false,
        };

        let window = Pager::new(post_count, self.page_size).window(requested_page);
        let posts =
            post_repo::list_posts_by_author(&self.pool, author.id, window.limit, window.offset)
                .await?;

        Ok(ProfileFeed {
            author,
            post_count,
            follower_count,
            following_count,
            following,
            feed: assemble_page(posts, window),
        })
    }

    /// Followed scope: posts by every author the viewer follows.
    pub async fn following_feed(&self, viewer: Uuid, requested_page: i64) -> Result<FeedPage> {
        FEED_REQUEST_TOTAL.with_label_values(&["followed"]).inc();

        let total = post_repo::count_followed_posts(&self.pool, viewer).await?;
        let window = Pager::new(total, self.page_size).window(requested_page);
        let posts =
            post_repo::list_followed_posts(&self.pool, viewer, window.limit, window.offset)
                .await?;

        Ok(assemble_page(posts, window))
    }
}

/// Bundle an ordered window of posts with its pagination metadata. The
/// repository guarantees ordering; this only attaches context.
fn assemble_page(posts: Vec<PostView>, window: PageWindow) -> FeedPage {
    FeedPage {
        posts,
        page: window.page,
        total_pages: window.total_pages,
        total_count: window.total_count,
        has_next: window.has_next,
        has_previous: window.has_previous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn post_view(ordinal: i64) -> PostView {
        PostView {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            author_username: "auth".to_string(),
            text: format!("post {}", ordinal),
            image_key: None,
            group_id: None,
            group_slug: None,
            group_title: None,
            created_at: Utc::now() + Duration::minutes(ordinal),
            updated_at: Utc::now() + Duration::minutes(ordinal),
        }
    }

    #[test]
    fn assemble_preserves_order_and_attaches_metadata() {
        let posts: Vec<PostView> = (0..10).rev().map(post_view).collect();
        let window = Pager::new(12, 10).window(1);

        let page = assemble_page(posts.clone(), window);

        assert_eq!(page.posts.len(), 10);
        assert_eq!(page.posts[0].text, posts[0].text);
        assert_eq!(page.posts[9].text, posts[9].text);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total_count, 12);
        assert!(page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn assemble_trailing_page() {
        let posts: Vec<PostView> = (0..2).rev().map(post_view).collect();
        let window = Pager::new(12, 10).window(2);

        let page = assemble_page(posts, window);

        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.page, 2);
        assert!(!page.has_next);
        assert!(page.has_previous);
    }
}
