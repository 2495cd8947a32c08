/// Engagement service - like toggling and like analytics
use crate::db::like_repo;
use crate::error::Result;
use crate::models::DailyLikes;
use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

pub struct EngagementService {
    pool: PgPool,
}

impl EngagementService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Flip the like membership for (post, user). Returns true when the
    /// call added a like, false when it removed one.
    ///
    /// The membership check and the write are separate statements, so two
    /// racing toggles can both observe "not liked"; the unique constraint
    /// on (post_id, user_id) collapses the second insert into a no-op.
    pub async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        if like_repo::user_has_liked(&self.pool, post_id, user_id).await? {
            like_repo::delete_like(&self.pool, post_id, user_id).await?;
            Ok(false)
        } else {
            like_repo::create_like(&self.pool, post_id, user_id).await?;
            Ok(true)
        }
    }

    /// Daily like totals, bucketed by the UTC creation day of the liked
    /// post (not the day the like was made). `to` is exclusive; days with
    /// zero likes are omitted.
    pub async fn likes_per_day(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyLikes>> {
        let from_ts = from.and_time(NaiveTime::MIN).and_utc();
        let to_ts = to.and_time(NaiveTime::MIN).and_utc();

        let entries = sqlx::query_as::<_, DailyLikes>(
            r#"
            SELECT (p.created_at AT TIME ZONE 'UTC')::date AS date,
                   COUNT(*) AS likes_count
            FROM likes l
            JOIN posts p ON p.id = l.post_id
            WHERE p.created_at >= $1 AND p.created_at < $2
            GROUP BY (p.created_at AT TIME ZONE 'UTC')::date
            ORDER BY date
            "#,
        )
        .bind(from_ts)
        .bind(to_ts)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
