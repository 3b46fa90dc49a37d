use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed fetch failed with HTTP {status} for {url}")]
    FetchFailed { status: u16, url: String },

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Post already exists for URL: {0}")]
    DuplicatePost(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User already exists: {0}")]
    UserExists(String),

    #[error("Feed not found: {0}")]
    FeedNotFound(String),

    #[error("Already following feed: {0}")]
    AlreadyFollowing(String),

    #[error("Not logged in; run `creel login <name>` first")]
    NotLoggedIn,
}

pub type Result<T> = std::result::Result<T, Error>;
