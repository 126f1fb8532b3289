//! Ports for content acquisition
//!
//! One trait per upstream kind. Both return normalized `NewsItem`s so
//! the rest of the pipeline never sees wire formats.

use async_trait::async_trait;

use crate::domain::entities::NewsItem;
use crate::error::FetchError;

/// Fetches and normalizes one RSS/Atom feed.
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Fetch `url` and return at most `limit` items. `name` is the
    /// source label carried onto each item.
    async fn fetch_feed(
        &self,
        name: &str,
        url: &str,
        limit: usize,
    ) -> Result<Vec<NewsItem>, FetchError>;
}

/// Runs topic queries against the search API.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<NewsItem>, FetchError>;
}
