/// Comment handlers - comment creation (comments are immutable once made)
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::handlers::{post_service, SharedFeedCache};
use crate::middleware::UserId;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

/// Attach a comment to a post.
pub async fn create_comment(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedFeedCache>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let comment = post_service(&pool, &cache)
        .add_comment(*post_id, user_id.0, &req.text)
        .await?;

    Ok(HttpResponse::Created().json(comment))
}
