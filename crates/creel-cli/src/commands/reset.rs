use anyhow::Result;

use creel_core::storage::{Database, UserRepository};

pub async fn run(db: &Database) -> Result<()> {
    let deleted = UserRepository::new(db).delete_all().await?;

    println!("Reset complete. {} user(s) deleted.", deleted);

    Ok(())
}
