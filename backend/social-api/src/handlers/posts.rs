/// Post handlers - HTTP endpoints for post operations
use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use futures::StreamExt;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::post_repo;
use crate::error::{AppError, Result};
use crate::middleware::{check_post_ownership, UserId};
use crate::models::{media_url, Post};
use crate::pagination::{paginate, resolve_page, POSTS_PAGE_SIZE};
use crate::services::{EngagementService, MediaStorage, PostService};

#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub page: Option<i64>,
    pub title: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,

    #[serde(default)]
    pub hashtags: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,

    #[serde(default)]
    pub hashtags: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PatchPostRequest {
    #[validate(length(min = 1, max = 255))]
    #[serde(default)]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    #[serde(default)]
    pub content: Option<String>,

    #[serde(default)]
    pub hashtags: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddCommentRequest {
    #[validate(length(min = 1))]
    pub content: String,
}

/// GET /posts/
pub async fn list_posts(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    query: web::Query<PostListQuery>,
) -> Result<HttpResponse> {
    let service = PostService::new(pool.get_ref().clone());
    let title = query.title.as_deref();
    let author = query.author.as_deref();

    let count = service.count_posts(title, author).await?;
    let page = resolve_page(query.page, count, POSTS_PAGE_SIZE)?;
    let offset = (page - 1) * POSTS_PAGE_SIZE;
    let results = service
        .list_posts(title, author, POSTS_PAGE_SIZE, offset)
        .await?;

    Ok(HttpResponse::Ok().json(paginate(&req, count, page, POSTS_PAGE_SIZE, results)))
}

/// GET /posts/{id}/
pub async fn get_post(pool: web::Data<PgPool>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let service = PostService::new(pool.get_ref().clone());
    let detail = service
        .get_post_detail(path.into_inner())
        .await?
        .ok_or_else(post_not_found)?;

    Ok(HttpResponse::Ok().json(detail))
}

/// POST /posts/
pub async fn create_post(
    user: UserId,
    pool: web::Data<PgPool>,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = PostService::new(pool.get_ref().clone());
    let created = service
        .create_post(
            user.0,
            &req.title,
            &req.content,
            req.hashtags.as_deref().unwrap_or(&[]),
        )
        .await?;

    tracing::info!(post_id = %created.id, author_id = %user.0, "post created");

    Ok(HttpResponse::Created().json(created))
}

/// PUT /posts/{id}/
pub async fn update_post(
    user: UserId,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let post_id = path.into_inner();
    let post = find_post(pool.get_ref(), post_id).await?;
    check_post_ownership(user.0, &post)?;

    let service = PostService::new(pool.get_ref().clone());
    let updated = service
        .update_post(
            post_id,
            Some(&req.title),
            Some(&req.content),
            req.hashtags.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// PATCH /posts/{id}/
pub async fn partial_update_post(
    user: UserId,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<PatchPostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let post_id = path.into_inner();
    let post = find_post(pool.get_ref(), post_id).await?;
    check_post_ownership(user.0, &post)?;

    let service = PostService::new(pool.get_ref().clone());
    let updated = service
        .update_post(
            post_id,
            req.title.as_deref(),
            req.content.as_deref(),
            req.hashtags.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /posts/{id}/
pub async fn delete_post(
    user: UserId,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    let post = find_post(pool.get_ref(), post_id).await?;
    check_post_ownership(user.0, &post)?;

    post_repo::delete_post(pool.get_ref(), post_id).await?;

    tracing::info!(%post_id, "post deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// POST /posts/{id}/like-unlike/
pub async fn like_unlike_post(
    user: UserId,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    find_post(pool.get_ref(), post_id).await?;

    let service = EngagementService::new(pool.get_ref().clone());
    let liked = service.toggle_like(post_id, user.0).await?;

    let detail = if liked {
        "You have successfully liked the post."
    } else {
        "Your like was successfully removed."
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({ "detail": detail })))
}

/// GET /posts/favorite/
pub async fn list_favorite_posts(user: UserId, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = PostService::new(pool.get_ref().clone());
    let favorites = service.favorite_posts(user.0).await?;

    Ok(HttpResponse::Ok().json(favorites))
}

/// POST /posts/{id}/add-comment/
pub async fn add_comment(
    user: UserId,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<AddCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let post_id = path.into_inner();
    find_post(pool.get_ref(), post_id).await?;

    let service = PostService::new(pool.get_ref().clone());
    service.add_comment(post_id, user.0, &req.content).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "detail": "Your comment has been successfully added to the post."
    })))
}

/// POST /posts/{id}/upload-image/
pub async fn upload_post_image(
    user: UserId,
    pool: web::Data<PgPool>,
    storage: web::Data<MediaStorage>,
    path: web::Path<Uuid>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    let post = find_post(pool.get_ref(), post_id).await?;
    check_post_ownership(user.0, &post)?;

    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(item) = payload.next().await {
        let mut field = item
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?;

        if field.name() != Some("image") {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("Image filename is required".to_string()))?;

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
            if data.len() + chunk.len() > storage.max_image_bytes() {
                return Err(AppError::BadRequest(format!(
                    "Image exceeds the {} byte limit",
                    storage.max_image_bytes()
                )));
            }
            data.extend_from_slice(&chunk);
        }

        image = Some((filename, data));
    }

    let (filename, data) =
        image.ok_or_else(|| AppError::BadRequest("No image file provided".to_string()))?;

    let relative_path = storage.save_post_image(&post.title, &filename, &data).await?;
    post_repo::set_post_image(pool.get_ref(), post_id, &relative_path).await?;

    tracing::info!(%post_id, path = %relative_path, "post image stored");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": post_id,
        "image": media_url(&relative_path),
    })))
}

async fn find_post(pool: &PgPool, post_id: Uuid) -> Result<Post> {
    post_repo::find_post_by_id(pool, post_id)
        .await?
        .ok_or_else(post_not_found)
}

fn post_not_found() -> AppError {
    AppError::NotFound("Post not found".to_string())
}
