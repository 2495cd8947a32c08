/// Hashtag handlers - CRUD over the hashtag catalog
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::hashtag_repo;
use crate::error::{AppError, Result};
use crate::models::Hashtag;
use crate::pagination::{paginate, resolve_page, HASHTAGS_PAGE_SIZE};

#[derive(Debug, Deserialize)]
pub struct HashtagListQuery {
    pub page: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct HashtagRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PatchHashtagRequest {
    #[validate(length(min = 1, max = 255))]
    #[serde(default)]
    pub name: Option<String>,
}

/// GET /hashtags/
pub async fn list_hashtags(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    query: web::Query<HashtagListQuery>,
) -> Result<HttpResponse> {
    let name = query.name.as_deref();

    let count = hashtag_repo::count_hashtags(pool.get_ref(), name).await?;
    let page = resolve_page(query.page, count, HASHTAGS_PAGE_SIZE)?;
    let offset = (page - 1) * HASHTAGS_PAGE_SIZE;
    let results =
        hashtag_repo::list_hashtags(pool.get_ref(), name, HASHTAGS_PAGE_SIZE, offset).await?;

    Ok(HttpResponse::Ok().json(paginate(&req, count, page, HASHTAGS_PAGE_SIZE, results)))
}

/// POST /hashtags/
pub async fn create_hashtag(
    pool: web::Data<PgPool>,
    req: web::Json<HashtagRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let hashtag = match hashtag_repo::create_hashtag(pool.get_ref(), &req.name).await {
        Ok(hashtag) => hashtag,
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            return Err(duplicate_name());
        }
        Err(e) => return Err(e.into()),
    };

    Ok(HttpResponse::Created().json(hashtag))
}

/// GET /hashtags/{id}/
pub async fn get_hashtag(pool: web::Data<PgPool>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let hashtag = hashtag_repo::find_hashtag_by_id(pool.get_ref(), path.into_inner())
        .await?
        .ok_or_else(hashtag_not_found)?;

    Ok(HttpResponse::Ok().json(hashtag))
}

/// PUT /hashtags/{id}/
pub async fn update_hashtag(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<HashtagRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let hashtag = rename_hashtag(pool.get_ref(), path.into_inner(), &req.name).await?;

    Ok(HttpResponse::Ok().json(hashtag))
}

/// PATCH /hashtags/{id}/
///
/// The model has a single writable field, so a partial update with no
/// body fields just reads the row back.
pub async fn partial_update_hashtag(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<PatchHashtagRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let hashtag_id = path.into_inner();

    let hashtag = match req.name.as_deref() {
        Some(name) => rename_hashtag(pool.get_ref(), hashtag_id, name).await?,
        None => hashtag_repo::find_hashtag_by_id(pool.get_ref(), hashtag_id)
            .await?
            .ok_or_else(hashtag_not_found)?,
    };

    Ok(HttpResponse::Ok().json(hashtag))
}

/// DELETE /hashtags/{id}/
pub async fn delete_hashtag(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if !hashtag_repo::delete_hashtag(pool.get_ref(), path.into_inner()).await? {
        return Err(hashtag_not_found());
    }

    Ok(HttpResponse::NoContent().finish())
}

async fn rename_hashtag(
    pool: &PgPool,
    hashtag_id: Uuid,
    name: &str,
) -> Result<Hashtag> {
    match hashtag_repo::update_hashtag(pool, hashtag_id, name).await {
        Ok(hashtag) => hashtag.ok_or_else(hashtag_not_found),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(duplicate_name()),
        Err(e) => Err(e.into()),
    }
}

fn hashtag_not_found() -> AppError {
    AppError::NotFound("Hashtag not found".to_string())
}

fn duplicate_name() -> AppError {
    AppError::Conflict("A hashtag with that name already exists.".to_string())
}
