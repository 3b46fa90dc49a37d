use anyhow::Result;

use creel_core::storage::{Database, UserRepository};
use creel_core::{AppConfig, Error};

pub async fn run(db: &Database, config: &mut AppConfig, name: &str) -> Result<()> {
    let user = UserRepository::new(db)
        .find_by_name(name)
        .await?
        .ok_or_else(|| Error::UserNotFound(name.to_string()))?;

    config.set_current_user(&user.name)?;

    println!("Logged in as '{}'.", user.name);

    Ok(())
}
