use anyhow::Result;

use creel_core::storage::{Database, FeedRepository, FollowRepository};
use creel_core::{AppConfig, Error};

use super::{normalize_url, require_login};

pub async fn run(db: &Database, config: &AppConfig, url: &str) -> Result<()> {
    let user = require_login(db, config).await?;
    let url = normalize_url(url)?;

    let feed = FeedRepository::new(db)
        .find_by_url(&url)
        .await?
        .ok_or_else(|| Error::FeedNotFound(url.clone()))?;

    FollowRepository::new(db).create(user.id, feed.id).await?;

    println!("'{}' is now following '{}'.", user.name, feed.name);

    Ok(())
}
