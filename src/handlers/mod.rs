/// HTTP request handlers
///
/// Handlers stay thin: decode the request, delegate to a service, encode
/// the response. Redirect semantics (login gate, non-author edit) live
/// here and in the middleware, never in the services.
pub mod comments;
pub mod feed;
pub mod groups;
pub mod posts;
pub mod profiles;

use actix_web::web;
use sqlx::PgPool;
use std::sync::Arc;

use crate::cache::FeedCache;
use crate::services::{FeedService, PostService};
use crate::Config;

/// Shared alias: the listing cache is absent when Redis is unavailable.
pub type SharedFeedCache = Option<Arc<FeedCache>>;

pub(crate) fn feed_service(
    pool: &web::Data<PgPool>,
    cache: &web::Data<SharedFeedCache>,
    config: &web::Data<Config>,
) -> FeedService {
    match cache.get_ref() {
        Some(cache) => {
            FeedService::with_cache(pool.get_ref().clone(), cache.clone(), config.feed.page_size)
        }
        None => FeedService::new(pool.get_ref().clone(), config.feed.page_size),
    }
}

pub(crate) fn post_service(
    pool: &web::Data<PgPool>,
    cache: &web::Data<SharedFeedCache>,
) -> PostService {
    match cache.get_ref() {
        Some(cache) => PostService::with_cache(pool.get_ref().clone(), cache.clone()),
        None => PostService::new(pool.get_ref().clone()),
    }
}
