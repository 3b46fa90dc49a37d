pub mod addfeed;
pub mod agg;
pub mod browse;
pub mod feeds;
pub mod follow;
pub mod following;
pub mod login;
pub mod register;
pub mod reset;
pub mod unfollow;
pub mod users;

use anyhow::Result;
use url::Url;

use creel_core::feed::User;
use creel_core::storage::{Database, UserRepository};
use creel_core::{AppConfig, Error};

/// Resolve the logged-in user from config, failing when nobody is logged in
/// or the configured user no longer exists.
pub async fn require_login(db: &Database, config: &AppConfig) -> Result<User> {
    let name = config
        .session
        .current_user
        .as_deref()
        .ok_or(Error::NotLoggedIn)?;

    UserRepository::new(db)
        .find_by_name(name)
        .await?
        .ok_or_else(|| Error::UserNotFound(name.to_string()).into())
}

/// Normalize a feed URL: a missing scheme gets https, and a host is
/// required.
pub fn normalize_url(raw: &str) -> Result<String> {
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    let parsed = Url::parse(&with_scheme).map_err(Error::UrlParse)?;
    if parsed.host_str().is_none() {
        anyhow::bail!("URL must contain a host: {raw}");
    }

    Ok(parsed.to_string())
}
