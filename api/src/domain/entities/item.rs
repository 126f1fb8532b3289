//! A single newsletter story

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// One story fetched from a feed or a search result.
///
/// The link is mandatory by construction: entries without a usable link
/// are dropped at fetch time. Titles can still arrive empty and are
/// filtered out when the email is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    /// Plain-text summary, already stripped of markup and truncated.
    pub excerpt: String,
    pub link: Url,
    /// Candidate article image, if the source offered one.
    pub image_url: Option<Url>,
    pub published_at: Option<DateTime<Utc>>,
    /// Display name of the source that produced this item.
    pub source_name: String,
}

impl NewsItem {
    /// Whether the item carries enough to appear in an email.
    pub fn is_renderable(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Site root of the item's link, used for favicon lookups.
    pub fn origin(&self) -> Option<Url> {
        self.link.join("/").ok()
    }
}
