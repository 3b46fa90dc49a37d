use anyhow::Result;

use creel_core::storage::{Database, FeedRepository};

pub async fn run(db: &Database) -> Result<()> {
    let feeds = FeedRepository::new(db).list_with_owners().await?;

    if feeds.is_empty() {
        println!("No feeds yet. Run `creel addfeed <name> <url>` to add one.");
        return Ok(());
    }

    println!("Feeds ({}):\n", feeds.len());
    for (feed, owner) in &feeds {
        println!("  {} (added by {})", feed.name, owner);
        println!("    URL: {}", feed.url);
        if let Some(last) = feed.last_fetched_at {
            println!("    Last fetched: {}", last.format("%Y-%m-%d %H:%M"));
        }
        println!();
    }

    Ok(())
}
