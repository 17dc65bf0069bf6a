/// Group handlers - group feed listing
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::error::Result;
use crate::handlers::{feed_service, SharedFeedCache};
use crate::services::pagination::PageQuery;
use crate::Config;

/// Posts filed under the group named by the slug, paginated. Unknown slugs
/// are a 404.
pub async fn get_group_feed(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedFeedCache>,
    config: web::Data<Config>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let feed = feed_service(&pool, &cache, &config)
        .group_feed(&slug, query.page)
        .await?;

    Ok(HttpResponse::Ok().json(feed))
}
