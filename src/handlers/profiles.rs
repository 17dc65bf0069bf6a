/// Profile handlers - author feed and the follow toggle
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::Result;
use crate::handlers::{feed_service, SharedFeedCache};
use crate::middleware::{UserId, Viewer};
use crate::services::pagination::PageQuery;
use crate::services::{FollowChange, FollowService};
use crate::Config;

#[derive(Debug, Serialize)]
pub struct FollowResponse {
    pub author: String,
    pub following: bool,
    /// False when the request was already satisfied (double follow or
    /// unfollow of an absent edge).
    pub changed: bool,
    pub follower_count: i64,
}

impl FollowResponse {
    fn new(change: FollowChange, following: bool) -> Self {
        Self {
            author: change.author.username,
            following,
            changed: change.changed,
            follower_count: change.follower_count,
        }
    }
}

/// Author feed with post count and the viewer's follow state. Public; an
/// absent viewer reads as not following.
pub async fn get_profile(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedFeedCache>,
    config: web::Data<Config>,
    username: web::Path<String>,
    viewer: Viewer,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let feed = feed_service(&pool, &cache, &config)
        .author_feed(&username, viewer.0, query.page)
        .await?;

    Ok(HttpResponse::Ok().json(feed))
}

/// Follow the author named by the path.
pub async fn follow_author(
    pool: web::Data<PgPool>,
    user_id: UserId,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let change = FollowService::new((**pool).clone())
        .follow(user_id.0, &username)
        .await?;

    Ok(HttpResponse::Ok().json(FollowResponse::new(change, true)))
}

/// Unfollow the author named by the path.
pub async fn unfollow_author(
    pool: web::Data<PgPool>,
    user_id: UserId,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let change = FollowService::new((**pool).clone())
        .unfollow(user_id.0, &username)
        .await?;

    Ok(HttpResponse::Ok().json(FollowResponse::new(change, false)))
}
