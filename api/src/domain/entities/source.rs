//! Content sources a newsletter is assembled from

use std::fmt;

use serde::{Deserialize, Serialize};

/// Feeds used when a request does not configure its own.
pub const DEFAULT_FEEDS: [(&str, &str); 3] = [
    ("techcrunch", "https://techcrunch.com/feed/"),
    ("mashable", "https://mashable.com/feed/"),
    ("cnet", "https://www.cnet.com/rss/all/"),
];

/// Where newsletter items come from.
///
/// A `Feed` names one RSS/Atom feed; a `Search` runs one query against
/// the search API. Items keep the order of the sources that produced
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Source {
    Feed { name: String, feed_url: String },
    Search { query: String, result_count: usize },
}

impl Source {
    pub fn feed(name: impl Into<String>, feed_url: impl Into<String>) -> Self {
        Source::Feed {
            name: name.into(),
            feed_url: feed_url.into(),
        }
    }

    pub fn search(query: impl Into<String>, result_count: usize) -> Self {
        Source::Search {
            query: query.into(),
            result_count,
        }
    }

    /// The built-in feed set.
    pub fn default_feeds() -> Vec<Source> {
        DEFAULT_FEEDS
            .iter()
            .map(|(name, url)| Source::feed(*name, *url))
            .collect()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Feed { name, feed_url } => write!(f, "feed {} ({})", name, feed_url),
            Source::Search { query, .. } => write!(f, "search \"{}\"", query),
        }
    }
}
