/// Post service - list/detail assembly, writes, and comments
use crate::db::{comment_repo, hashtag_repo, like_repo, post_repo};
use crate::error::{AppError, Result};
use crate::models::{media_url, Comment, PostDetail, PostListItem, PostRow, PostWriteResponse};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Number of posts matching the optional title/author filters
    pub async fn count_posts(&self, title: Option<&str>, author: Option<&str>) -> Result<i64> {
        Ok(post_repo::count_posts(&self.pool, title, author).await?)
    }

    /// One page of posts, newest-first, with counts and hashtag names attached
    pub async fn list_posts(
        &self,
        title: Option<&str>,
        author: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostListItem>> {
        let rows = post_repo::list_posts(&self.pool, title, author, limit, offset).await?;
        self.hydrate_list_items(rows).await
    }

    /// Every post the user has liked, newest-first. Not paginated.
    pub async fn favorite_posts(&self, user_id: Uuid) -> Result<Vec<PostListItem>> {
        let rows = post_repo::list_favorite_posts(&self.pool, user_id).await?;
        self.hydrate_list_items(rows).await
    }

    /// Full post detail with liker usernames and nested comments
    pub async fn get_post_detail(&self, post_id: Uuid) -> Result<Option<PostDetail>> {
        let Some(row) = post_repo::find_post_row_by_id(&self.pool, post_id).await? else {
            return Ok(None);
        };

        let hashtags = post_repo::get_hashtag_names_batch(&self.pool, &[post_id])
            .await?
            .remove(&post_id)
            .unwrap_or_default();
        let likes = like_repo::get_post_liker_usernames(&self.pool, post_id).await?;
        let comments = comment_repo::get_post_comments(&self.pool, post_id).await?;

        Ok(Some(PostDetail {
            id: row.id,
            author: row.author,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
            hashtags,
            likes,
            comments,
            image: row.image.as_deref().map(media_url),
        }))
    }

    /// Create a post and attach the given hashtags
    pub async fn create_post(
        &self,
        author_id: Uuid,
        title: &str,
        content: &str,
        hashtag_ids: &[Uuid],
    ) -> Result<PostWriteResponse> {
        self.check_hashtags_exist(hashtag_ids).await?;

        let post = post_repo::create_post(&self.pool, author_id, title, content).await?;
        post_repo::set_post_hashtags(&self.pool, post.id, hashtag_ids).await?;
        let hashtags = post_repo::get_post_hashtag_ids(&self.pool, post.id).await?;

        Ok(PostWriteResponse {
            id: post.id,
            title: post.title,
            content: post.content,
            created_at: post.created_at,
            hashtags,
        })
    }

    /// Update title/content and, when given, replace the hashtag set.
    /// Fields passed as None are left unchanged.
    pub async fn update_post(
        &self,
        post_id: Uuid,
        title: Option<&str>,
        content: Option<&str>,
        hashtag_ids: Option<&[Uuid]>,
    ) -> Result<PostWriteResponse> {
        if let Some(ids) = hashtag_ids {
            self.check_hashtags_exist(ids).await?;
        }

        let post = post_repo::update_post(&self.pool, post_id, title, content).await?;
        if let Some(ids) = hashtag_ids {
            post_repo::set_post_hashtags(&self.pool, post_id, ids).await?;
        }
        let hashtags = post_repo::get_post_hashtag_ids(&self.pool, post_id).await?;

        Ok(PostWriteResponse {
            id: post.id,
            title: post.title,
            content: post.content,
            created_at: post.created_at,
            hashtags,
        })
    }

    /// Attach a comment to a post
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> Result<Comment> {
        Ok(comment_repo::create_comment(&self.pool, post_id, author_id, content).await?)
    }

    /// Reject writes that reference hashtag IDs with no matching row
    async fn check_hashtags_exist(&self, hashtag_ids: &[Uuid]) -> Result<()> {
        if hashtag_ids.is_empty() {
            return Ok(());
        }

        let existing = hashtag_repo::filter_existing_ids(&self.pool, hashtag_ids).await?;
        if let Some(missing) = hashtag_ids.iter().find(|id| !existing.contains(id)) {
            return Err(AppError::Validation(format!(
                "Invalid pk \"{}\" - object does not exist.",
                missing
            )));
        }

        Ok(())
    }

    /// Attach like/comment counts and hashtag names to a batch of rows
    async fn hydrate_list_items(&self, rows: Vec<PostRow>) -> Result<Vec<PostListItem>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut hashtags = post_repo::get_hashtag_names_batch(&self.pool, &post_ids).await?;
        let likes = like_repo::count_likes_batch(&self.pool, &post_ids).await?;
        let comments = comment_repo::count_comments_batch(&self.pool, &post_ids).await?;

        let items = rows
            .into_iter()
            .map(|row| PostListItem {
                id: row.id,
                author: row.author,
                title: row.title,
                content: row.content,
                created_at: row.created_at,
                hashtags: hashtags.remove(&row.id).unwrap_or_default(),
                likes_count: likes.get(&row.id).copied().unwrap_or(0),
                comments_count: comments.get(&row.id).copied().unwrap_or(0),
                image: row.image.as_deref().map(media_url),
            })
            .collect();

        Ok(items)
    }
}
