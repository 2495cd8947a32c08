pub mod analytics;
pub mod auth;
pub mod hashtags;
pub mod health;
pub mod posts;
pub mod users;

pub use analytics::get_analytics;
pub use auth::{obtain_token, refresh_token, signup, verify_token};
pub use hashtags::{
    create_hashtag, delete_hashtag, get_hashtag, list_hashtags, partial_update_hashtag,
    update_hashtag,
};
pub use health::health_check;
pub use posts::{
    add_comment, create_post, delete_post, get_post, like_unlike_post, list_favorite_posts,
    list_posts, partial_update_post, update_post, upload_post_image,
};
pub use users::{get_activity, get_me, patch_me, put_me};
