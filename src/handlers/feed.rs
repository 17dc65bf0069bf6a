/// Feed handlers - the global and followed-authors listing surfaces
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::error::Result;
use crate::handlers::{feed_service, SharedFeedCache};
use crate::middleware::UserId;
use crate::services::pagination::PageQuery;
use crate::Config;

/// Global feed, paginated. Public; served from the listing cache when warm.
pub async fn get_global_feed(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedFeedCache>,
    config: web::Data<Config>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let feed = feed_service(&pool, &cache, &config)
        .global_feed(query.page)
        .await?;

    Ok(HttpResponse::Ok().json(feed))
}

/// Posts from every author the viewer follows, paginated.
pub async fn get_following_feed(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedFeedCache>,
    config: web::Data<Config>,
    user_id: UserId,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let feed = feed_service(&pool, &cache, &config)
        .following_feed(user_id.0, query.page)
        .await?;

    Ok(HttpResponse::Ok().json(feed))
}
