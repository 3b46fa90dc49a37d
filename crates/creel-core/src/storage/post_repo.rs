use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::{is_unique_violation, Database, PostStore};
use crate::feed::{NewPost, Post};
use crate::{Error, Result};

/// Repository for ingested posts
pub struct PostRepository {
    db: Database,
}

#[derive(FromRow)]
struct PostRow {
    id: String,
    feed_id: String,
    title: String,
    url: String,
    description: String,
    published_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            feed_id: Uuid::parse_str(&row.feed_id).unwrap_or_default(),
            title: row.title,
            url: row.url,
            description: row.description,
            published_at: row.published_at,
            created_at: row.created_at,
        }
    }
}

/// A post joined with the name of the feed it came from
#[derive(Debug, Clone)]
pub struct PostWithFeed {
    pub post: Post,
    pub feed_name: String,
}

#[derive(FromRow)]
struct PostWithFeedRow {
    #[sqlx(flatten)]
    post: PostRow,
    feed_name: String,
}

impl PostRepository {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    /// Posts from feeds the user follows, newest publication first.
    /// Posts without a publication date sort last.
    pub async fn list_for_user(&self, user_id: Uuid, limit: u32) -> Result<Vec<PostWithFeed>> {
        let rows: Vec<PostWithFeedRow> = sqlx::query_as(
            r#"
            SELECT p.id, p.feed_id, p.title, p.url, p.description,
                   p.published_at, p.created_at, f.name AS feed_name
            FROM posts p
            JOIN feeds f ON f.id = p.feed_id
            JOIN feed_follows ff ON ff.feed_id = p.feed_id
            WHERE ff.user_id = ?
            ORDER BY p.published_at DESC, p.created_at DESC
            LIMIT ?
            "#,
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| PostWithFeed {
                post: Post::from(row.post),
                feed_name: row.feed_name,
            })
            .collect())
    }
}

#[async_trait]
impl PostStore for PostRepository {
    async fn create(&self, new_post: &NewPost) -> Result<Post> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO posts (id, feed_id, title, url, description, published_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(new_post.feed_id.to_string())
        .bind(&new_post.title)
        .bind(&new_post.url)
        .bind(&new_post.description)
        .bind(new_post.published_at)
        .bind(now)
        .execute(self.db.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::DuplicatePost(new_post.url.clone())
            } else {
                Error::Database(e)
            }
        })?;

        Ok(Post {
            id,
            feed_id: new_post.feed_id,
            title: new_post.title.clone(),
            url: new_post.url.clone(),
            description: new_post.description.clone(),
            published_at: new_post.published_at,
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{NewFeed, NewUser};
    use crate::storage::{FeedRepository, FollowRepository, UserRepository};
    use chrono::TimeZone;

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
        FollowRepository::new(&db)
            .create(user.id, feed.id)
            .await
            .unwrap();
        (db, user.id, feed.id)
    }

    fn new_post(feed_id: Uuid, title: &str, url: &str) -> NewPost {
        NewPost {
            feed_id,
            title: title.to_string(),
            url: url.to_string(),
            description: "text".to_string(),
            published_at: None,
        }
    }

    #[tokio::test]
    async fn duplicate_url_keeps_the_first_post() {
        let (db, user_id, feed_id) = setup().await;
        let posts = PostRepository::new(&db);

        posts
            .create(&new_post(feed_id, "original title", "http://x/1"))
            .await
            .unwrap();
        let result = posts
            .create(&new_post(feed_id, "changed title", "http://x/1"))
            .await;

        assert!(matches!(result, Err(Error::DuplicatePost(url)) if url == "http://x/1"));

        let listed = posts.list_for_user(user_id, 10).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].post.title, "original title");
    }

    #[tokio::test]
    async fn browse_orders_by_publication_and_respects_limit() {
        let (db, user_id, feed_id) = setup().await;
        let posts = PostRepository::new(&db);

        let older = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let mut undated = new_post(feed_id, "undated", "http://x/undated");
        undated.published_at = None;
        posts.create(&undated).await.unwrap();

        let mut old = new_post(feed_id, "old", "http://x/old");
        old.published_at = Some(older);
        posts.create(&old).await.unwrap();

        let mut new = new_post(feed_id, "new", "http://x/new");
        new.published_at = Some(newer);
        posts.create(&new).await.unwrap();

        let listed = posts.list_for_user(user_id, 10).await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|p| p.post.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "old", "undated"]);

        let limited = posts.list_for_user(user_id, 2).await.unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn browse_only_shows_followed_feeds() {
        let (db, user_id, feed_id) = setup().await;
        let posts = PostRepository::new(&db);

        // A second feed the user does not follow
        let other_feed = FeedRepository::new(&db)
            .create(&NewFeed {
                url: "https://other.example.com/rss".into(),
                name: "other".into(),
                user_id,
            })
            .await
            .unwrap();

        posts
            .create(&new_post(feed_id, "followed", "http://x/followed"))
            .await
            .unwrap();
        posts
            .create(&new_post(other_feed.id, "unfollowed", "http://x/unfollowed"))
            .await
            .unwrap();

        let listed = posts.list_for_user(user_id, 10).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].post.title, "followed");
        assert_eq!(listed[0].feed_name, "blog");
    }
}
