mod dates;
mod fetcher;
mod models;
mod parser;

pub use dates::parse_pub_date;
pub use fetcher::FeedFetcher;
pub use models::{Feed, FeedFollow, NewFeed, NewPost, NewUser, Post, User};
pub use parser::{parse_document, RawChannel, RawFeedDocument, RawItem};
