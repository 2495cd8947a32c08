/// Ownership-based permission checks
///
/// Posts carry a single immutable author; only that author may update,
/// delete, or attach images to the post. Likes and comments are open to
/// any authenticated user.
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Post;

/// Result type for permission checks
pub type PermissionResult = Result<(), AppError>;

/// Check if a user owns a post
pub fn check_post_ownership(user_id: Uuid, post: &Post) -> PermissionResult {
    if post.author_id == user_id {
        Ok(())
    } else {
        Err(AppError::Authorization(
            "You don't have permission to modify this post".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post_owned_by(author_id: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            author_id,
            title: "title".to_string(),
            content: "content".to_string(),
            image: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_passes() {
        let user_id = Uuid::new_v4();
        assert!(check_post_ownership(user_id, &post_owned_by(user_id)).is_ok());
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        let err = check_post_ownership(Uuid::new_v4(), &post_owned_by(Uuid::new_v4())).unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }
}
