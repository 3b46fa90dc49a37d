use anyhow::Result;

use creel_core::storage::{Database, UserRepository};
use creel_core::AppConfig;

pub async fn run(db: &Database, config: &AppConfig) -> Result<()> {
    let users = UserRepository::new(db).list_all().await?;

    if users.is_empty() {
        println!("No users registered yet. Run `creel register <name>` first.");
        return Ok(());
    }

    let current = config.session.current_user.as_deref();
    for user in &users {
        if Some(user.name.as_str()) == current {
            println!("* {} (current)", user.name);
        } else {
            println!("* {}", user.name);
        }
    }

    Ok(())
}
