use anyhow::Result;

use creel_core::storage::{Database, FollowRepository};
use creel_core::AppConfig;

use super::require_login;

pub async fn run(db: &Database, config: &AppConfig) -> Result<()> {
    let user = require_login(db, config).await?;
    let feeds = FollowRepository::new(db).feeds_for_user(user.id).await?;

    if feeds.is_empty() {
        println!("'{}' is not following any feeds.", user.name);
        return Ok(());
    }

    println!("Feeds followed by '{}':", user.name);
    for feed in &feeds {
        println!("  * {}", feed.name);
    }

    Ok(())
}
