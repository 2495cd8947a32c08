/// User profile handlers - self readback, updates, and activity
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{User, UserActivityResponse, UserResponse};
use crate::security::hash_password;
use uuid::Uuid;

#[derive(Debug, Deserialize, Validate)]
pub struct PutUserRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[validate(length(min = 5))]
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PatchUserRequest {
    #[validate(length(min = 1, max = 150))]
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[validate(length(min = 5))]
    #[serde(default)]
    pub password: Option<String>,
}

/// GET /user/me/
pub async fn get_me(user: UserId, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let me = user_repo::find_by_id(pool.get_ref(), user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(me)))
}

/// PUT /user/me/
pub async fn put_me(
    user: UserId,
    pool: web::Data<PgPool>,
    req: web::Json<PutUserRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let password_hash = match req.password.as_deref() {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let updated = apply_profile_update(
        pool.get_ref(),
        user.0,
        Some(&req.username),
        req.email.as_deref(),
        req.first_name.as_deref(),
        req.last_name.as_deref(),
        password_hash.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// PATCH /user/me/
pub async fn patch_me(
    user: UserId,
    pool: web::Data<PgPool>,
    req: web::Json<PatchUserRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let password_hash = match req.password.as_deref() {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let updated = apply_profile_update(
        pool.get_ref(),
        user.0,
        req.username.as_deref(),
        req.email.as_deref(),
        req.first_name.as_deref(),
        req.last_name.as_deref(),
        password_hash.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// GET /user/activity/
pub async fn get_activity(user: UserId, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let me = user_repo::find_by_id(pool.get_ref(), user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserActivityResponse {
        username: me.username,
        last_login: me.last_login,
        last_request_time: me.last_request_time,
    }))
}

async fn apply_profile_update(
    pool: &PgPool,
    user_id: Uuid,
    username: Option<&str>,
    email: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
    password_hash: Option<&str>,
) -> Result<User> {
    match user_repo::update_profile(
        pool,
        user_id,
        username,
        email,
        first_name,
        last_name,
        password_hash,
    )
    .await
    {
        Ok(user) => Ok(user),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
            "A user with that username already exists.".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}
