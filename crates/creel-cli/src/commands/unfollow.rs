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

    let removed = FollowRepository::new(db).delete(user.id, feed.id).await?;

    if removed {
        println!("Unfollowed '{}'.", feed.name);
    } else {
        println!("You were not following '{}'.", feed.name);
    }

    Ok(())
}
