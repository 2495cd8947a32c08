/// Auth handlers - signup and JWT token endpoints
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::models::UserResponse;
use crate::security::{hash_password, jwt, verify_password};

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[validate(length(min = 5))]
    pub password: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TokenObtainRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenRefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenVerifyRequest {
    pub token: String,
}

/// POST /user/signup/
pub async fn signup(
    pool: web::Data<PgPool>,
    req: web::Json<SignupRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    if user_repo::find_by_username(pool.get_ref(), &req.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "A user with that username already exists.".to_string(),
        ));
    }

    let password_hash = hash_password(&req.password)?;

    // The pre-check races with concurrent signups; the unique constraint
    // settles it.
    let user = match user_repo::create_user(
        pool.get_ref(),
        &req.username,
        req.email.as_deref().unwrap_or(""),
        req.first_name.as_deref().unwrap_or(""),
        req.last_name.as_deref().unwrap_or(""),
        &password_hash,
    )
    .await
    {
        Ok(user) => user,
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            return Err(AppError::Conflict(
                "A user with that username already exists.".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %user.id, username = %user.username, "user signed up");

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// POST /user/token/
pub async fn obtain_token(
    pool: web::Data<PgPool>,
    req: web::Json<TokenObtainRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let user = user_repo::find_by_username(pool.get_ref(), &req.username)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(invalid_credentials());
    }

    let pair = jwt::generate_token_pair(user.id, &user.email, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    user_repo::touch_last_login(pool.get_ref(), user.id).await?;

    Ok(HttpResponse::Ok().json(pair))
}

/// POST /user/token/refresh/
pub async fn refresh_token(req: web::Json<TokenRefreshRequest>) -> Result<HttpResponse> {
    let access = jwt::refresh_access_token(&req.refresh)
        .map_err(|e| AppError::Authentication(e.to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "access": access })))
}

/// POST /user/token/verify/
pub async fn verify_token(req: web::Json<TokenVerifyRequest>) -> Result<HttpResponse> {
    jwt::validate_token(&req.token).map_err(|e| AppError::Authentication(e.to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({})))
}

fn invalid_credentials() -> AppError {
    AppError::Authentication("No active account found with the given credentials".to_string())
}
