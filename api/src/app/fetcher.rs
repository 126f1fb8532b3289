//! Source fan-out
//!
//! Walks the configured sources in order, skipping failures, until the
//! request's item budget is reached.

use std::sync::Arc;

use crate::domain::entities::{NewsItem, Source};
use crate::domain::ports::{FeedClient, SearchClient};
use crate::error::PipelineError;

/// Entry cap applied to each feed before the request-wide limit.
pub const PER_FEED_ITEM_CAP: usize = 5;

/// Fetches items from every configured source.
pub struct Fetcher<F, S>
where
    F: FeedClient,
    S: SearchClient,
{
    feeds: Arc<F>,
    search: Arc<S>,
}

impl<F, S> Fetcher<F, S>
where
    F: FeedClient,
    S: SearchClient,
{
    pub fn new(feeds: Arc<F>, search: Arc<S>) -> Self {
        Self { feeds, search }
    }

    /// Fetch from each source in order. A failing source is skipped
    /// with a warning; a run that yields nothing at all is an error.
    pub async fn fetch(
        &self,
        sources: &[Source],
        limit: usize,
    ) -> Result<Vec<NewsItem>, PipelineError> {
        let mut items: Vec<NewsItem> = Vec::new();

        for source in sources {
            if items.len() >= limit {
                break;
            }
            let remaining = limit - items.len();

            let result = match source {
                Source::Feed { name, feed_url } => {
                    self.feeds
                        .fetch_feed(name, feed_url, PER_FEED_ITEM_CAP.min(remaining))
                        .await
                }
                Source::Search {
                    query,
                    result_count,
                } => self.search.search(query, *result_count).await,
            };

            match result {
                Ok(batch) => items.extend(batch.into_iter().take(remaining)),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", source, e);
                }
            }
        }

        if items.is_empty() {
            return Err(PipelineError::NoContentAvailable);
        }
        Ok(items)
    }
}
