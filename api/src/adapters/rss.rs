//! RSS/Atom feed adapter built on feed-rs
//!
//! Entries are normalized into `NewsItem`s: markup stripped from
//! excerpts, the best candidate image picked from media extensions or
//! the entry body, and entries without a usable link dropped.

use std::time::Duration;

use async_trait::async_trait;
use feed_rs::model::Entry;
use reqwest::Client;
use url::Url;

use crate::domain::entities::NewsItem;
use crate::domain::ports::FeedClient;
use crate::error::FetchError;

use super::text;

const FEED_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches feeds over HTTP and maps their entries.
pub struct RssFeedClient {
    http: Client,
}

impl RssFeedClient {
    pub fn new() -> Self {
        Self {
            http: Client::builder()
                .user_agent(concat!("newsroom/", env!("CARGO_PKG_VERSION")))
                .timeout(FEED_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for RssFeedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedClient for RssFeedClient {
    async fn fetch_feed(
        &self,
        name: &str,
        url: &str,
        limit: usize,
    ) -> Result<Vec<NewsItem>, FetchError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
                message: format!("feed {} returned non-success", name),
            });
        }

        let bytes = response.bytes().await?;
        let feed = feed_rs::parser::parse(&bytes[..])?;

        let items = feed
            .entries
            .iter()
            .filter_map(|entry| entry_to_item(entry, name))
            .take(limit)
            .collect();
        Ok(items)
    }
}

/// Map one feed entry, or `None` when it has no usable link.
fn entry_to_item(entry: &Entry, source_name: &str) -> Option<NewsItem> {
    let link = entry
        .links
        .first()
        .and_then(|link| Url::parse(&link.href).ok())?;

    let title = entry
        .title
        .as_ref()
        .map(|title| title.content.clone())
        .unwrap_or_default();

    let body = entry
        .summary
        .as_ref()
        .map(|summary| summary.content.clone())
        .or_else(|| entry.content.as_ref().and_then(|content| content.body.clone()))
        .unwrap_or_default();

    let image_url = media_image(entry).or_else(|| text::first_img_src(&body));

    Some(NewsItem {
        title,
        excerpt: text::clean_excerpt(&body),
        link,
        image_url,
        published_at: entry.published.or(entry.updated),
        source_name: source_name.to_string(),
    })
}

/// Candidate image from media extensions: the first `media:content`
/// URL, then the first thumbnail.
fn media_image(entry: &Entry) -> Option<Url> {
    for media in &entry.media {
        if let Some(url) = media.content.iter().find_map(|content| content.url.clone()) {
            return Some(url);
        }
        if let Some(url) = media
            .thumbnails
            .iter()
            .find_map(|thumb| Url::parse(&thumb.image.uri).ok())
        {
            return Some(url);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>Example</title>
    <link>https://example.com</link>
    <description>Sample</description>
    <item>
      <title>Robots learn to fold laundry</title>
      <link>https://example.com/robots</link>
      <description>&lt;p&gt;Summary with &lt;b&gt;markup&lt;/b&gt; and an inline image &lt;img src="https://example.com/inline.png"&gt;&lt;/p&gt;</description>
      <pubDate>Mon, 05 Aug 2024 12:00:00 GMT</pubDate>
      <media:content url="https://example.com/robots.jpg" medium="image"/>
    </item>
    <item>
      <title>Entry without a link</title>
      <description>dropped at fetch time</description>
    </item>
    <item>
      <title>Chip prices fall again</title>
      <link>https://example.com/chips</link>
      <description>&lt;img src="https://example.com/chips.gif"&gt; plain text follows</description>
    </item>
  </channel>
</rss>"#;

    fn sample_items() -> Vec<NewsItem> {
        let feed = feed_rs::parser::parse(SAMPLE_FEED.as_bytes()).unwrap();
        feed.entries
            .iter()
            .filter_map(|entry| entry_to_item(entry, "example"))
            .collect()
    }

    #[test]
    fn maps_title_link_and_source() {
        let items = sample_items();
        assert_eq!(items[0].title, "Robots learn to fold laundry");
        assert_eq!(items[0].link.as_str(), "https://example.com/robots");
        assert_eq!(items[0].source_name, "example");
    }

    #[test]
    fn drops_entries_without_links() {
        let items = sample_items();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|item| item.title != "Entry without a link"));
    }

    #[test]
    fn prefers_media_content_over_inline_images() {
        let items = sample_items();
        assert_eq!(
            items[0].image_url.as_ref().map(Url::as_str),
            Some("https://example.com/robots.jpg")
        );
    }

    #[test]
    fn falls_back_to_an_image_from_the_entry_body() {
        let items = sample_items();
        assert_eq!(
            items[1].image_url.as_ref().map(Url::as_str),
            Some("https://example.com/chips.gif")
        );
    }

    #[test]
    fn strips_markup_from_excerpts() {
        let items = sample_items();
        assert!(items[0].excerpt.contains("Summary with markup"));
        assert!(!items[0].excerpt.contains('<'));
    }

    #[test]
    fn parses_publish_dates() {
        use chrono::Datelike;

        let items = sample_items();
        let published = items[0].published_at.unwrap();
        assert_eq!(published.year(), 2024);
        assert_eq!(published.month(), 8);
        assert!(items[1].published_at.is_none());
    }
}
