mod database;
mod feed_repo;
mod follow_repo;
mod post_repo;
mod user_repo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::feed::{Feed, NewPost, Post};
use crate::Result;

pub use database::Database;
pub use feed_repo::FeedRepository;
pub use follow_repo::FollowRepository;
pub use post_repo::{PostRepository, PostWithFeed};
pub use user_repo::UserRepository;

/// Feed selection and fairness stamping, as the ingest worker sees it.
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// The single feed with the oldest `last_fetched_at`; never-fetched
    /// feeds come first, in insertion order.
    async fn next_to_fetch(&self) -> Result<Option<Feed>>;

    /// Stamp the feed's `last_fetched_at` and `updated_at`, returning the
    /// updated row.
    async fn mark_fetched(&self, feed_id: Uuid, fetched_at: DateTime<Utc>) -> Result<Feed>;
}

/// Post creation, as the ingest worker sees it.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a post; fails with `DuplicatePost` when the URL is already
    /// known.
    async fn create(&self, new_post: &NewPost) -> Result<Post>;
}

/// True when the underlying storage rejected a row for violating a
/// uniqueness constraint, independent of engine error codes.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
