use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::{is_unique_violation, Database};
use crate::feed::{Feed, FeedFollow};
use crate::{Error, Result};

/// Repository for user-follows-feed relationships
pub struct FollowRepository {
    db: Database,
}

#[derive(FromRow)]
struct FollowRow {
    id: String,
    user_id: String,
    feed_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FollowRow> for FeedFollow {
    fn from(row: FollowRow) -> Self {
        FeedFollow {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            user_id: Uuid::parse_str(&row.user_id).unwrap_or_default(),
            feed_id: Uuid::parse_str(&row.feed_id).unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl FollowRepository {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    /// Follow a feed. Following the same feed twice is reported as a
    /// duplicate rather than a raw constraint error.
    pub async fn create(&self, user_id: Uuid, feed_id: Uuid) -> Result<FeedFollow> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO feed_follows (id, user_id, feed_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(feed_id.to_string())
        .bind(now)
        .bind(now)
        .execute(self.db.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::AlreadyFollowing(feed_id.to_string())
            } else {
                Error::Database(e)
            }
        })?;

        Ok(FeedFollow {
            id,
            user_id,
            feed_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Feeds followed by a user, oldest follow first
    pub async fn feeds_for_user(&self, user_id: Uuid) -> Result<Vec<Feed>> {
        #[derive(FromRow)]
        struct JoinedFeedRow {
            id: String,
            url: String,
            name: String,
            user_id: String,
            last_fetched_at: Option<DateTime<Utc>>,
            created_at: DateTime<Utc>,
            updated_at: DateTime<Utc>,
        }

        let rows: Vec<JoinedFeedRow> = sqlx::query_as(
            r#"
            SELECT f.id, f.url, f.name, f.user_id, f.last_fetched_at,
                   f.created_at, f.updated_at
            FROM feeds f
            JOIN feed_follows ff ON ff.feed_id = f.id
            WHERE ff.user_id = ?
            ORDER BY ff.created_at ASC
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Feed {
                id: Uuid::parse_str(&row.id).unwrap_or_default(),
                url: row.url,
                name: row.name,
                user_id: Uuid::parse_str(&row.user_id).unwrap_or_default(),
                last_fetched_at: row.last_fetched_at,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect())
    }

    /// Stop following a feed; true when a follow actually existed
    pub async fn delete(&self, user_id: Uuid, feed_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM feed_follows
            WHERE user_id = ? AND feed_id = ?
            "#,
        )
        .bind(user_id.to_string())
        .bind(feed_id.to_string())
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{NewFeed, NewUser};
    use crate::storage::{FeedRepository, UserRepository};

    async fn setup() -> (Database, Uuid, Uuid) {
        let db = Database::new_in_memory().await.unwrap();
        let user = UserRepository::new(&db)
            .create(&NewUser { name: "ada".into() })
            .await
            .unwrap();
        let feed = FeedRepository::new(&db)
            .create(&NewFeed {
                url: "https://blog.example.com/rss".into(),
                name: "blog".into(),
                user_id: user.id,
            })
            .await
            .unwrap();
        (db, user.id, feed.id)
    }

    #[tokio::test]
    async fn follow_then_list_then_unfollow() {
        let (db, user_id, feed_id) = setup().await;
        let follows = FollowRepository::new(&db);

        follows.create(user_id, feed_id).await.unwrap();

        let followed = follows.feeds_for_user(user_id).await.unwrap();
        assert_eq!(followed.len(), 1);
        assert_eq!(followed[0].id, feed_id);

        assert!(follows.delete(user_id, feed_id).await.unwrap());
        assert!(follows.feeds_for_user(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn double_follow_is_rejected() {
        let (db, user_id, feed_id) = setup().await;
        let follows = FollowRepository::new(&db);

        follows.create(user_id, feed_id).await.unwrap();
        let result = follows.create(user_id, feed_id).await;
        assert!(matches!(result, Err(Error::AlreadyFollowing(_))));
    }

    #[tokio::test]
    async fn unfollow_without_follow_reports_false() {
        let (db, user_id, feed_id) = setup().await;
        let follows = FollowRepository::new(&db);

        assert!(!follows.delete(user_id, feed_id).await.unwrap());
    }
}
