/// Post handlers - detail, creation, and author-gated editing
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::group_repo;
use crate::error::Result;
use crate::handlers::{post_service, SharedFeedCache};
use crate::middleware::UserId;
use crate::services::{EditOutcome, EditPost, NewPost};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub text: String,
    /// Group slug; empty or absent files the post under no group.
    pub group: Option<String>,
    pub image_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditPostRequest {
    pub text: String,
    pub group: Option<String>,
    pub image_key: Option<String>,
}

/// Editable fields of a post, as handed to an edit form.
#[derive(Debug, Serialize)]
pub struct EditFormData {
    pub id: Uuid,
    pub text: String,
    pub group: Option<String>,
    pub image_key: Option<String>,
}

/// The read view a refused editor is sent back to.
fn read_view(post_id: Uuid) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, format!("/api/v1/posts/{}", post_id)))
        .finish()
}

/// Single post with its comments. Public.
pub async fn get_post(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedFeedCache>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let detail = post_service(&pool, &cache).post_detail(*post_id).await?;

    Ok(HttpResponse::Ok().json(detail))
}

/// Create a new post authored by the caller.
pub async fn create_post(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedFeedCache>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let post = post_service(&pool, &cache)
        .create_post(
            user_id.0,
            NewPost {
                text: req.text,
                group: req.group,
                image_key: req.image_key,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// Editable fields of a post. A non-author is sent to the read view.
pub async fn get_post_edit(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedFeedCache>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    match post_service(&pool, &cache)
        .editable_post(*post_id, user_id.0)
        .await?
    {
        EditOutcome::NotAuthor { post_id } => Ok(read_view(post_id)),
        EditOutcome::Applied(post) => {
            let group = match post.group_id {
                Some(group_id) => group_repo::find_group_by_id(&pool, group_id)
                    .await
                    .map_err(crate::error::AppError::from)?
                    .map(|group| group.slug),
                None => None,
            };

            Ok(HttpResponse::Ok().json(EditFormData {
                id: post.id,
                text: post.text,
                group,
                image_key: post.image_key,
            }))
        }
    }
}

/// Submit an edit. A non-author is sent to the read view and the stored
/// post is untouched.
pub async fn submit_post_edit(
    pool: web::Data<PgPool>,
    cache: web::Data<SharedFeedCache>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
    req: web::Json<EditPostRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    match post_service(&pool, &cache)
        .edit_post(
            *post_id,
            user_id.0,
            EditPost {
                text: req.text,
                group: req.group,
                image_key: req.image_key,
            },
        )
        .await?
    {
        EditOutcome::NotAuthor { post_id } => Ok(read_view(post_id)),
        EditOutcome::Applied(post) => Ok(HttpResponse::Ok().json(post)),
    }
}
