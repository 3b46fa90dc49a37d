use std::sync::Arc;

use chrono::Utc;

use crate::feed::{parse_pub_date, FeedFetcher, NewPost};
use crate::storage::{FeedStore, PostStore};
use crate::{Error, Result};

/// What a single ingest cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No feeds are registered
    Idle,
    /// The feed was fetched and its items were ingested
    Ingested { feed: String, new_posts: u32 },
    /// The fetch failed; the feed waits for its next turn in the rotation
    FetchFailed { feed: String },
}

/// Runs one feed's worth of ingestion per invocation: select the feed that
/// has waited longest, stamp it, fetch it, persist its new posts.
pub struct IngestWorker {
    feeds: Arc<dyn FeedStore>,
    posts: Arc<dyn PostStore>,
    fetcher: FeedFetcher,
}

impl IngestWorker {
    pub fn new(feeds: Arc<dyn FeedStore>, posts: Arc<dyn PostStore>, fetcher: FeedFetcher) -> Self {
        Self {
            feeds,
            posts,
            fetcher,
        }
    }

    /// Run exactly one ingest cycle.
    ///
    /// The feed's `last_fetched_at` is stamped BEFORE the network call:
    /// a feed whose fetch hangs or errors moves to the back of the rotation
    /// either way, so one broken feed cannot monopolize the loop.
    ///
    /// Fetch and parse failures are logged and skipped, not propagated:
    /// the cycle simply yields nothing for this feed. Only repository
    /// failures in the select/stamp steps surface as errors, and the
    /// scheduler treats those as non-fatal too.
    pub async fn run_one_cycle(&self) -> Result<CycleOutcome> {
        let Some(feed) = self.feeds.next_to_fetch().await? else {
            tracing::debug!("no feeds registered, nothing to ingest");
            return Ok(CycleOutcome::Idle);
        };

        let feed = self.feeds.mark_fetched(feed.id, Utc::now()).await?;

        let document = match self.fetcher.fetch(&feed.url).await {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(feed = %feed.name, url = %feed.url, error = %e, "feed fetch failed, skipping until its next turn");
                return Ok(CycleOutcome::FetchFailed { feed: feed.name });
            }
        };

        tracing::info!(feed = %feed.name, channel = %document.channel.title, items = document.channel.items.len(), "fetched feed");

        let mut new_posts = 0;
        for item in document.channel.items {
            if item.link.is_empty() {
                tracing::debug!(feed = %feed.name, title = %item.title, "item has no link, skipping");
                continue;
            }

            let new_post = NewPost {
                feed_id: feed.id,
                title: item.title,
                url: item.link,
                description: item.description,
                published_at: parse_pub_date(&item.pub_date),
            };

            match self.posts.create(&new_post).await {
                Ok(_) => new_posts += 1,
                Err(Error::DuplicatePost(_)) => continue,
                Err(e) => {
                    tracing::warn!(feed = %feed.name, url = %new_post.url, error = %e, "post insert failed, aborting remaining items for this feed");
                    break;
                }
            }
        }

        tracing::info!(feed = %feed.name, new_posts, "ingest cycle complete");
        Ok(CycleOutcome::Ingested {
            feed: feed.name,
            new_posts,
        })
    }
}
