use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub last_login: Option<DateTime<Utc>>,
    pub last_request_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Hashtag {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Like {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Public user shape returned by signup and the /user/me/ endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Activity readback for /user/activity/
#[derive(Debug, Serialize, Deserialize)]
pub struct UserActivityResponse {
    pub username: String,
    pub last_login: Option<DateTime<Utc>>,
    pub last_request_time: Option<DateTime<Utc>>,
}

/// Post row joined with its author's username, before count hydration
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author: String,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// List item shape: aggregated counts and hashtag names attached
#[derive(Debug, Serialize, Deserialize)]
pub struct PostListItem {
    pub id: Uuid,
    pub author: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub hashtags: Vec<String>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub image: Option<String>,
}

/// Detail shape: likers and nested comments instead of counts
#[derive(Debug, Serialize, Deserialize)]
pub struct PostDetail {
    pub id: Uuid,
    pub author: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub hashtags: Vec<String>,
    pub likes: Vec<String>,
    pub comments: Vec<CommentDetail>,
    pub image: Option<String>,
}

/// Comment with its author resolved to a username
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommentDetail {
    pub id: Uuid,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Write echo for post create/update: hashtags as ids
#[derive(Debug, Serialize, Deserialize)]
pub struct PostWriteResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub hashtags: Vec<Uuid>,
}

/// One analytics entry: likes on posts created that day
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyLikes {
    pub date: NaiveDate,
    pub likes_count: i64,
}

/// Pagination envelope for list endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Serialize a stored media path as a client-facing URL
pub fn media_url(path: &str) -> String {
    format!("/media/{}", path)
}
