use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Database, FeedStore};
use crate::feed::{Feed, NewFeed};
use crate::{Error, Result};

/// Repository for feed CRUD and fetch-rotation queries
pub struct FeedRepository {
    db: Database,
}

#[derive(FromRow)]
struct FeedRow {
    id: String,
    url: String,
    name: String,
    user_id: String,
    last_fetched_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FeedRow> for Feed {
    fn from(row: FeedRow) -> Self {
        Feed {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            url: row.url,
            name: row.name,
            user_id: Uuid::parse_str(&row.user_id).unwrap_or_default(),
            last_fetched_at: row.last_fetched_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct FeedWithOwnerRow {
    #[sqlx(flatten)]
    feed: FeedRow,
    owner_name: String,
}

const FEED_COLUMNS: &str =
    "id, url, name, user_id, last_fetched_at, created_at, updated_at";

impl FeedRepository {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    /// Register a new feed
    pub async fn create(&self, new_feed: &NewFeed) -> Result<Feed> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO feeds (id, url, name, user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&new_feed.url)
        .bind(&new_feed.name)
        .bind(new_feed.user_id.to_string())
        .bind(now)
        .bind(now)
        .execute(self.db.pool())
        .await?;

        Ok(Feed {
            id,
            url: new_feed.url.clone(),
            name: new_feed.name.clone(),
            user_id: new_feed.user_id,
            last_fetched_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Find a feed by URL
    pub async fn find_by_url(&self, url: &str) -> Result<Option<Feed>> {
        let row: Option<FeedRow> = sqlx::query_as(&format!(
            "SELECT {FEED_COLUMNS} FROM feeds WHERE url = ?"
        ))
        .bind(url)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(Feed::from))
    }

    /// All feeds with the name of the user who added each one
    pub async fn list_with_owners(&self) -> Result<Vec<(Feed, String)>> {
        let rows: Vec<FeedWithOwnerRow> = sqlx::query_as(
            r#"
            SELECT f.id, f.url, f.name, f.user_id, f.last_fetched_at,
                   f.created_at, f.updated_at, u.name AS owner_name
            FROM feeds f
            JOIN users u ON u.id = f.user_id
            ORDER BY f.created_at ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (Feed::from(row.feed), row.owner_name))
            .collect())
    }
}

#[async_trait]
impl FeedStore for FeedRepository {
    /// Round-robin-by-recency selection: the feed that has waited longest
    /// for a fetch. Never-fetched feeds sort first, in insertion order.
    async fn next_to_fetch(&self) -> Result<Option<Feed>> {
        let row: Option<FeedRow> = sqlx::query_as(&format!(
            r#"
            SELECT {FEED_COLUMNS} FROM feeds
            ORDER BY last_fetched_at ASC NULLS FIRST, created_at ASC, rowid ASC
            LIMIT 1
            "#
        ))
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(Feed::from))
    }

    async fn mark_fetched(&self, feed_id: Uuid, fetched_at: DateTime<Utc>) -> Result<Feed> {
        sqlx::query(
            r#"
            UPDATE feeds
            SET last_fetched_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(fetched_at)
        .bind(fetched_at)
        .bind(feed_id.to_string())
        .execute(self.db.pool())
        .await?;

        let row: Option<FeedRow> = sqlx::query_as(&format!(
            "SELECT {FEED_COLUMNS} FROM feeds WHERE id = ?"
        ))
        .bind(feed_id.to_string())
        .fetch_optional(self.db.pool())
        .await?;

        row.map(Feed::from)
            .ok_or_else(|| Error::FeedNotFound(feed_id.to_string()))
    }
}
