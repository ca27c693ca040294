//! Daily motivational quote: cached item plus the feed client.
//!
//! The feed is the only network boundary in the hub. Fetch failures never
//! touch stored state - the previous quote simply stays on display.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::QuoteError;

/// Default feed. ZenQuotes shape: a JSON array of `{ "q": .., "a": .. }`.
pub const DEFAULT_QUOTE_FEED: &str = "https://zenquotes.io/api/today";

/// A cached quote stays fresh for this long.
pub const QUOTE_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteItem {
    pub text: String,
    pub author: String,
    pub fetched_at: DateTime<Utc>,
}

impl QuoteItem {
    /// True once the quote is more than [`QUOTE_TTL_HOURS`] old.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.fetched_at) > Duration::hours(QUOTE_TTL_HOURS)
    }
}

/// One row of the feed payload.
#[derive(Debug, Deserialize)]
struct FeedEntry {
    #[serde(rename = "q")]
    quote: String,
    #[serde(rename = "a", default)]
    author: String,
}

/// Async client for the quote feed.
///
/// Cancel-safe: dropping the in-flight future aborts the request, and a
/// result that arrives late is simply never applied by the caller.
#[derive(Debug, Clone)]
pub struct QuoteFetcher {
    client: reqwest::Client,
    endpoint: Url,
}

impl QuoteFetcher {
    pub fn new(feed_url: &str) -> Result<Self, QuoteError> {
        let endpoint = Url::parse(feed_url).map_err(|e| QuoteError::InvalidUrl {
            url: feed_url.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the first quote of today's feed, stamped with `now`.
    pub async fn fetch_today(&self, now: DateTime<Utc>) -> Result<QuoteItem, QuoteError> {
        let response = self.client.get(self.endpoint.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::BadStatus {
                status: status.as_u16(),
            });
        }
        let entries: Vec<FeedEntry> = response.json().await?;
        let first = entries.into_iter().next().ok_or(QuoteError::EmptyFeed)?;
        Ok(QuoteItem {
            text: first.quote,
            author: first.author,
            fetched_at: now,
        })
    }
}
