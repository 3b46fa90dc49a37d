use anyhow::Result;

use creel_core::storage::{Database, PostRepository};
use creel_core::AppConfig;

use super::require_login;

pub async fn run(db: &Database, config: &AppConfig, limit: u32) -> Result<()> {
    let user = require_login(db, config).await?;
    let posts = PostRepository::new(db).list_for_user(user.id, limit).await?;

    if posts.is_empty() {
        println!("No posts yet. Follow some feeds and run `creel agg`.");
        return Ok(());
    }

    for entry in &posts {
        let published = match entry.post.published_at {
            Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
            None => "unknown".to_string(),
        };

        println!("{}", "-".repeat(50));
        println!("Title: {}", entry.post.title);
        println!("URL: {}", entry.post.url);
        println!("Description: {}", entry.post.description);
        println!("Published: {}", published);
        println!("Feed: {}", entry.feed_name);
    }
    println!("{}", "-".repeat(50));

    Ok(())
}
