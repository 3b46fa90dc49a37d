use std::time::Duration;

use reqwest::header::USER_AGENT;
use reqwest::Client;

use super::parser::{parse_document, RawFeedDocument};
use crate::config::AppConfig;
use crate::{Error, Result};

/// Client identifier sent with every feed request
const CLIENT_ID: &str = concat!("creel/", env!("CARGO_PKG_VERSION"));

/// Fetches and decodes one RSS document per call.
///
/// Holds a single HTTP client with the configured timeout. There are no
/// retries: a failed fetch waits for the feed's next turn in the rotation.
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.sync.request_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(Error::Http)?;

        Ok(Self { client })
    }

    /// Fetch a feed URL and parse the body as RSS.
    ///
    /// The whole body is read before parsing; feed documents are small.
    /// Content-Type is not enforced; servers label RSS inconsistently.
    pub async fn fetch(&self, url: &str) -> Result<RawFeedDocument> {
        tracing::debug!(url, "fetching feed");

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, CLIENT_ID)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::FetchFailed {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        parse_document(&body)
    }
}
