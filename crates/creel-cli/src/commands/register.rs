use anyhow::Result;

use creel_core::feed::NewUser;
use creel_core::storage::{Database, UserRepository};
use creel_core::AppConfig;

pub async fn run(db: &Database, config: &mut AppConfig, name: &str) -> Result<()> {
    let user = UserRepository::new(db)
        .create(&NewUser {
            name: name.to_string(),
        })
        .await?;

    config.set_current_user(&user.name)?;

    println!("Registered and logged in as '{}'.", user.name);
    println!("  id: {}", user.id);
    println!("  created: {}", user.created_at.format("%Y-%m-%d %H:%M"));

    Ok(())
}
