/// Data models for blog-service
///
/// This module defines structures for:
/// - User: authors resolved by username (provisioned out-of-band)
/// - Group: named collections posts can be filed under
/// - Post: authored text with an optional image attachment and group
/// - Comment: immutable replies attached to a post
///
/// Row structs map 1:1 onto tables; the `*View` structs are the joined
/// shapes handed to the presentation layer. Follow edges never leave the
/// repository layer, so they have no row struct here.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user as provisioned by the identity provider.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// A group posts can be filed under. Created out-of-band.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A post row. Mutable only by its author.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub image_key: Option<String>,
    pub group_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post joined with its author and group for listing surfaces.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostView {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub text: String,
    pub image_key: Option<String>,
    pub group_id: Option<Uuid>,
    pub group_slug: Option<String>,
    pub group_title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment row. Immutable once created.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A comment joined with its author's username.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// One paginated window of posts plus its pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    pub posts: Vec<PostView>,
    pub page: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Group feed: the group record plus its page of posts.
#[derive(Debug, Clone, Serialize)]
pub struct GroupFeed {
    pub group: Group,
    #[serde(flatten)]
    pub feed: FeedPage,
}

/// Author feed: the author, their total post count, whether the viewer
/// follows them, and a page of their posts.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileFeed {
    pub author: User,
    pub post_count: i64,
    pub follower_count: i64,
    pub following_count: i64,
    /// Whether the requesting viewer follows this author; absent viewers
    /// read as not following.
    pub following: bool,
    #[serde(flatten)]
    pub feed: FeedPage,
}

/// Single post with its comments.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: PostView,
    pub author_post_count: i64,
    pub comments: Vec<CommentView>,
    pub comment_count: i64,
}
