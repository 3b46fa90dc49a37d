use anyhow::Result;

use creel_core::feed::NewFeed;
use creel_core::storage::{Database, FeedRepository, FollowRepository};
use creel_core::AppConfig;

use super::{normalize_url, require_login};

pub async fn run(db: &Database, config: &AppConfig, name: &str, url: &str) -> Result<()> {
    let user = require_login(db, config).await?;
    let url = normalize_url(url)?;

    let feed = FeedRepository::new(db)
        .create(&NewFeed {
            url,
            name: name.to_string(),
            user_id: user.id,
        })
        .await?;

    FollowRepository::new(db).create(user.id, feed.id).await?;

    println!("Added feed '{}' ({}).", feed.name, feed.id);
    println!("  URL: {}", feed.url);
    println!("You are now following it.");

    Ok(())
}
